mod common;

use esg_core::{
    build_feature_vector, AnalysisEngine, AnalysisError, FeatureError, FeatureSchema,
    InferenceError, SimulationInput, TierClassifier,
};
use esg_core::FeatureVector;
use esg_schema::feature_names;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::sync::Arc;

fn bundled_schema() -> FeatureSchema {
    FeatureSchema::from_file(&common::fixture("feature_columns.json")).expect("fixture schema")
}

#[test]
fn default_profile_fills_mapped_columns_only() {
    let schema = bundled_schema();
    let row = build_feature_vector(&SimulationInput::default(), &schema).unwrap();

    assert_eq!(row.len(), 14);
    assert_eq!(row.names(), schema.names());
    assert_eq!(row.get(feature_names::GOVERNANCE), Some(75.0));
    assert_eq!(row.get(feature_names::SOCIAL), Some(60.0));
    assert_eq!(row.get(feature_names::ENVIRONMENTAL), Some(65.0));
    assert_eq!(row.get(feature_names::CARBON_EMISSIONS), Some(250.0));
    assert_eq!(row.get(feature_names::ENERGY_CONSUMPTION), Some(1200.0));
    let unmapped: f64 = row
        .iter()
        .filter(|(name, _)| !feature_names::MAPPED.contains(name))
        .map(|(_, value)| value.abs())
        .sum();
    assert_eq!(unmapped, 0.0);
}

#[test]
fn pillar_extremes_pass_through() {
    let schema = bundled_schema();
    let low = build_feature_vector(&SimulationInput::clamped(0, 0, 0, 0.0, 0.0), &schema).unwrap();
    assert!(low.values().iter().all(|value| *value == 0.0));

    let high =
        build_feature_vector(&SimulationInput::clamped(100, 100, 100, 0.0, 0.0), &schema).unwrap();
    assert_eq!(high.get(feature_names::GOVERNANCE), Some(100.0));
    assert_eq!(high.get(feature_names::SOCIAL), Some(100.0));
    assert_eq!(high.get(feature_names::ENVIRONMENTAL), Some(100.0));
}

#[test]
fn out_of_range_pillars_are_clamped_before_projection() {
    let schema = bundled_schema();
    let row =
        build_feature_vector(&SimulationInput::clamped(140, -3, 100, 1.0, 2.0), &schema).unwrap();
    assert_eq!(row.get(feature_names::GOVERNANCE), Some(100.0));
    assert_eq!(row.get(feature_names::SOCIAL), Some(0.0));
}

#[test]
fn building_twice_gives_identical_rows() {
    let schema = bundled_schema();
    let input = SimulationInput::clamped(31, 77, 12, 1e6, -40.5);
    let first = build_feature_vector(&input, &schema).unwrap();
    let second = build_feature_vector(&input, &schema).unwrap();
    assert_eq!(first, second);
}

#[test]
fn random_inputs_keep_schema_shape() {
    let schema = bundled_schema();
    let mut rng = SmallRng::seed_from_u64(0x5eed_e5);

    for _ in 0..1_000 {
        let input = SimulationInput::clamped(
            rng.gen_range(-20..=120),
            rng.gen_range(-20..=120),
            rng.gen_range(-20..=120),
            rng.gen_range(-1.0e5..1.0e5),
            rng.gen_range(-1.0e5..1.0e5),
        );
        let row = build_feature_vector(&input, &schema).unwrap();
        assert_eq!(row.len(), schema.len());
        for (name, value) in row.iter() {
            let expected = input
                .mapped_features()
                .iter()
                .find(|(mapped, _)| *mapped == name)
                .map_or(0.0, |(_, value)| *value);
            assert_eq!(value, expected, "column {name}");
        }
    }
}

#[test]
fn schema_without_energy_is_reported() {
    let schema = FeatureSchema::from_file(&common::fixture("feature_columns_missing_energy.json"))
        .expect("fixture schema");
    let err = build_feature_vector(&SimulationInput::default(), &schema).unwrap_err();
    assert_eq!(
        err,
        FeatureError::SchemaMismatch {
            missing: vec![feature_names::ENERGY_CONSUMPTION]
        }
    );
}

struct NeverCalled;

impl TierClassifier for NeverCalled {
    fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<String>, InferenceError> {
        panic!("classifier must not run when the schema is incomplete");
    }
}

#[test]
fn engine_surfaces_schema_mismatch_without_predicting() {
    let schema = FeatureSchema::from_file(&common::fixture("feature_columns_missing_energy.json"))
        .expect("fixture schema");
    let engine = AnalysisEngine::new(Arc::new(schema), Arc::new(NeverCalled)).unwrap();

    let err = engine.analyze(&SimulationInput::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::SchemaMismatch(_)));
    assert!(err.to_string().contains("EnergyConsumption"));
}
