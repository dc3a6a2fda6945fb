//! Startup-loaded artifacts and the per-request analysis path.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use esg_schema::{Presentation, PredictionResult, SimulationInput};
use thiserror::Error;
use tracing::{debug, info};

use crate::classifier::{classify, presentation_for, InferenceError, TierClassifier};
use crate::feature_schema::{FeatureSchema, SchemaError};
use crate::features::{build_feature_vector, FeatureError, FeatureVector};
use crate::model::{ModelArtifact, ModelError};

/// Where the model and feature schema artifacts live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub features: PathBuf,
}

impl ArtifactPaths {
    /// Artifacts shipped with this crate.
    pub fn bundled() -> Self {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data");
        Self {
            model: data_dir.join("sustainability_model.json"),
            features: data_dir.join("feature_columns.json"),
        }
    }

    /// Pick each path from the first source that provides one, falling back to
    /// the bundled artifacts.
    pub fn resolve(
        model: impl IntoIterator<Item = Option<PathBuf>>,
        features: impl IntoIterator<Item = Option<PathBuf>>,
    ) -> Self {
        let bundled = Self::bundled();
        Self {
            model: model.into_iter().flatten().next().unwrap_or(bundled.model),
            features: features
                .into_iter()
                .flatten()
                .next()
                .unwrap_or(bundled.features),
        }
    }
}

/// Startup failures. None of these has a fallback.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model unavailable ({origin}): {source}")]
    ModelUnavailable {
        origin: String,
        #[source]
        source: ModelError,
    },
    #[error("feature schema unavailable ({origin}): {source}")]
    SchemaUnavailable {
        origin: String,
        #[source]
        source: SchemaError,
    },
    #[error("model unavailable: it expects {model} features but the schema lists {schema}")]
    WidthMismatch { model: usize, schema: usize },
}

/// Request-time failures, surfaced to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    SchemaMismatch(#[from] FeatureError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub input: SimulationInput,
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub presentation: Presentation,
}

/// Loaded schema and classifier, immutable for the life of the process.
#[derive(Clone)]
pub struct AnalysisEngine {
    schema: Arc<FeatureSchema>,
    classifier: Arc<dyn TierClassifier>,
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("schema", &self.schema)
            .field("n_features", &self.classifier.n_features())
            .finish()
    }
}

impl AnalysisEngine {
    /// Pair a schema with a classifier, rejecting a model that declares a
    /// different input width than the schema provides.
    pub fn new(
        schema: Arc<FeatureSchema>,
        classifier: Arc<dyn TierClassifier>,
    ) -> Result<Self, ArtifactError> {
        if let Some(width) = classifier.n_features() {
            if width != schema.len() {
                return Err(ArtifactError::WidthMismatch {
                    model: width,
                    schema: schema.len(),
                });
            }
        }
        Ok(Self { schema, classifier })
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let schema = load_schema(&paths.features)?;
        let model = load_model(&paths.model)?;
        info!(
            target: "esg::artifacts",
            model = %paths.model.display(),
            features = %paths.features.display(),
            kind = model.kind(),
            columns = schema.len(),
            "artifacts.loaded=file"
        );
        Self::new(Arc::new(schema), Arc::new(model))
    }

    /// Engine over the artifacts compiled into this crate.
    pub fn builtin() -> Result<Self, ArtifactError> {
        let schema = FeatureSchema::builtin().map_err(|source| ArtifactError::SchemaUnavailable {
            origin: "builtin".to_string(),
            source,
        })?;
        let model = ModelArtifact::builtin().map_err(|source| ArtifactError::ModelUnavailable {
            origin: "builtin".to_string(),
            source,
        })?;
        info!(target: "esg::artifacts", "artifacts.loaded=builtin");
        Self::new(Arc::new(schema), Arc::new(model))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Build the feature row for `input`, predict its tier and pick the
    /// presentation.
    pub fn analyze(&self, input: &SimulationInput) -> Result<AnalysisOutcome, AnalysisError> {
        let features = build_feature_vector(input, &self.schema)?;
        let prediction = classify(self.classifier.as_ref(), &features)?;
        let presentation = presentation_for(prediction.tier);
        debug!(
            target: "esg::analysis",
            governance = input.governance,
            social = input.social,
            environmental = input.environmental,
            carbon = input.carbon_footprint,
            energy = input.energy_consumption,
            "analysis.input"
        );
        info!(
            target: "esg::analysis",
            label = %prediction.label,
            tier = %prediction.tier,
            treatment = presentation.treatment.as_str(),
            "analysis.completed"
        );
        Ok(AnalysisOutcome {
            input: *input,
            features,
            prediction,
            presentation,
        })
    }
}

fn load_schema(path: &Path) -> Result<FeatureSchema, ArtifactError> {
    FeatureSchema::from_file(path).map_err(|source| ArtifactError::SchemaUnavailable {
        origin: path.display().to_string(),
        source,
    })
}

fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    ModelArtifact::from_file(path).map_err(|source| ArtifactError::ModelUnavailable {
        origin: path.display().to_string(),
        source,
    })
}
