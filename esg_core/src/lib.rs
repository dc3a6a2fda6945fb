//! Core analysis crate for the ESG tier simulator.
//!
//! Turns a [`SimulationInput`] into the classifier's feature row, runs the
//! trained tier model over it and picks how the result is presented. The model
//! and feature schema are loaded once into an [`AnalysisEngine`] and shared
//! read-only afterwards.

mod classifier;
pub mod dashboard_config;
mod engine;
mod feature_schema;
mod features;
mod model;
pub mod radar;

pub use esg_schema::{
    Pillar, Presentation, PredictionResult, SimulationInput, Tier, Treatment, PILLAR_MAX,
    PILLAR_MIN,
};

pub use classifier::{classify, presentation_for, InferenceError, TierClassifier};
pub use dashboard_config::{
    load_dashboard_config, load_dashboard_config_from_env, DashboardConfig, Theme,
};
pub use engine::{AnalysisEngine, AnalysisError, AnalysisOutcome, ArtifactError, ArtifactPaths};
pub use feature_schema::{FeatureSchema, SchemaError};
pub use features::{build_feature_vector, FeatureError, FeatureVector};
pub use model::{ModelArtifact, ModelError};
pub use radar::RadarProfile;
