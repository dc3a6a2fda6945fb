//! Adapter between feature rows and the externally trained tier classifier.

use esg_schema::{Presentation, PredictionResult, Tier, Treatment};
use thiserror::Error;
use tracing::warn;

use crate::features::FeatureVector;

/// Errors raised while running a prediction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("row has {actual} features but the model expects {expected}")]
    RowWidth { expected: usize, actual: usize },
    #[error("feature '{feature}' is not a finite number")]
    NonFinite { feature: String },
    #[error("classifier returned no labels")]
    EmptyOutput,
    #[error("tree {tree} references missing node {node}")]
    BadNode { tree: usize, node: usize },
    #[error("classifier failed: {0}")]
    Backend(String),
}

/// A pre-trained model that labels feature rows.
///
/// Implementations return one label per input row, in row order.
pub trait TierClassifier: Send + Sync {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>, InferenceError>;

    /// Number of columns the model was fitted on, when it is known.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// Predict a single row and interpret the label.
pub fn classify(
    classifier: &dyn TierClassifier,
    row: &FeatureVector,
) -> Result<PredictionResult, InferenceError> {
    let label = classifier
        .predict(std::slice::from_ref(row))?
        .into_iter()
        .next()
        .ok_or(InferenceError::EmptyOutput)?;
    if !Tier::is_known_label(&label) {
        warn!(
            target: "esg::analysis",
            %label,
            "prediction.unrecognized_label=treated_as_average"
        );
    }
    Ok(PredictionResult::from_label(label))
}

/// Presentation treatment for a tier.
pub fn presentation_for(tier: Tier) -> Presentation {
    match tier {
        Tier::Leader => Presentation {
            treatment: Treatment::Success,
            celebrate: true,
        },
        Tier::Laggard => Presentation {
            treatment: Treatment::Error,
            celebrate: false,
        },
        Tier::Average => Presentation {
            treatment: Treatment::Warning,
            celebrate: false,
        },
    }
}
