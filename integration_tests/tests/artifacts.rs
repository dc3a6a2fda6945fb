mod common;

use esg_core::{
    AnalysisEngine, ArtifactError, ArtifactPaths, ModelArtifact, ModelError, SchemaError,
    SimulationInput, Tier,
};

#[test]
fn missing_model_file_is_unavailable() {
    let paths = ArtifactPaths {
        model: common::fixture("feature_columns.json").with_file_name("no_such_model.json"),
        features: common::fixture("feature_columns.json"),
    };
    let err = AnalysisEngine::load(&paths).unwrap_err();
    match err {
        ArtifactError::ModelUnavailable { origin, source } => {
            assert!(origin.ends_with("no_such_model.json"));
            assert!(matches!(source, ModelError::Read { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn corrupt_model_is_unavailable() {
    let err = AnalysisEngine::load(&common::fixture_paths(
        "malformed_model.json",
        "feature_columns.json",
    ))
    .unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::ModelUnavailable {
            source: ModelError::Invalid(_),
            ..
        }
    ));
}

#[test]
fn model_that_is_not_json_is_unavailable() {
    // A schema file is valid JSON but not a model.
    let err = AnalysisEngine::load(&common::fixture_paths(
        "feature_columns.json",
        "feature_columns.json",
    ))
    .unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::ModelUnavailable {
            source: ModelError::Parse(_),
            ..
        }
    ));
}

#[test]
fn unreadable_schema_is_unavailable() {
    let paths = ArtifactPaths {
        model: common::fixture("sustainability_model.json"),
        features: common::fixture("sustainability_model.json").with_file_name("absent.json"),
    };
    let err = AnalysisEngine::load(&paths).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::SchemaUnavailable {
            source: SchemaError::Read { .. },
            ..
        }
    ));
}

#[test]
fn model_and_schema_widths_must_agree() {
    let err = AnalysisEngine::load(&common::fixture_paths(
        "sustainability_model.json",
        "feature_columns_missing_energy.json",
    ))
    .unwrap_err();
    match err {
        ArtifactError::WidthMismatch { model, schema } => {
            assert_eq!(model, 14);
            assert_eq!(schema, 13);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fixture_model_describes_itself() {
    let model = ModelArtifact::from_file(&common::fixture("sustainability_model.json")).unwrap();
    assert_eq!(model.kind(), "random_forest");
    assert_eq!(model.input_width(), 14);
    assert_eq!(model.classes(), ["Average", "Laggard", "Leader"]);

    let linear = ModelArtifact::from_file(&common::fixture("linear_model_reordered.json")).unwrap();
    assert_eq!(linear.kind(), "logistic_regression");
    assert_eq!(linear.input_width(), 6);
}

#[test]
fn projection_follows_the_schema_column_order() -> anyhow::Result<()> {
    let engine = AnalysisEngine::load(&common::fixture_paths(
        "linear_model_reordered.json",
        "feature_columns_reordered.json",
    ))?;

    let outcome = engine.analyze(&SimulationInput::clamped(90, 5, 5, 250.0, 1200.0))?;
    assert_eq!(outcome.features.values(), [1200.0, 90.0, 0.0, 250.0, 5.0, 5.0]);
    assert_eq!(outcome.prediction.tier, Tier::Leader);

    let average = engine.analyze(&SimulationInput::clamped(50, 100, 100, 0.0, 0.0))?;
    assert_eq!(average.prediction.tier, Tier::Average);

    let laggard = engine.analyze(&SimulationInput::clamped(10, 100, 100, 0.0, 0.0))?;
    assert_eq!(laggard.prediction.tier, Tier::Laggard);
    Ok(())
}

#[test]
fn resolve_prefers_first_provided_path() {
    let cli = common::fixture("linear_model_reordered.json");
    let configured = common::fixture("sustainability_model.json");
    let paths = ArtifactPaths::resolve(
        [None, Some(cli.clone()), Some(configured)],
        [None, None],
    );
    assert_eq!(paths.model, cli);
    assert_eq!(paths.features, ArtifactPaths::bundled().features);
}
