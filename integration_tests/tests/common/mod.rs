#![allow(dead_code)]

use std::path::PathBuf;

use esg_core::{AnalysisEngine, ArtifactPaths};

pub fn fixture(name: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);

    debug_assert!(path.exists(), "missing test fixture at {}", path.display());
    path
}

pub fn fixture_paths(model: &str, features: &str) -> ArtifactPaths {
    ArtifactPaths {
        model: fixture(model),
        features: fixture(features),
    }
}

pub fn fixture_engine() -> anyhow::Result<AnalysisEngine> {
    let engine = AnalysisEngine::load(&fixture_paths(
        "sustainability_model.json",
        "feature_columns.json",
    ))?;
    Ok(engine)
}
