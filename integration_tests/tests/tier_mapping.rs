mod common;

use std::sync::{Arc, Mutex};

use esg_core::{
    AnalysisEngine, AnalysisError, FeatureSchema, FeatureVector, InferenceError, SimulationInput,
    Tier, TierClassifier, Treatment,
};

/// Returns a fixed label and remembers the rows it was asked about.
struct Scripted {
    label: &'static str,
    seen: Mutex<Vec<Vec<f64>>>,
}

impl Scripted {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl TierClassifier for Scripted {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<String>, InferenceError> {
        let mut seen = self.seen.lock().unwrap();
        seen.extend(rows.iter().map(|row| row.values().to_vec()));
        Ok(rows.iter().map(|_| self.label.to_string()).collect())
    }
}

struct Failing;

impl TierClassifier for Failing {
    fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<String>, InferenceError> {
        Err(InferenceError::Backend("runtime crashed".to_string()))
    }
}

fn engine_with(classifier: Arc<dyn TierClassifier>) -> AnalysisEngine {
    let schema = FeatureSchema::from_file(&common::fixture("feature_columns.json")).unwrap();
    AnalysisEngine::new(Arc::new(schema), classifier).unwrap()
}

#[test]
fn leader_is_celebrated() {
    let classifier = Scripted::new("Leader");
    let engine = engine_with(classifier.clone());
    let outcome = engine.analyze(&SimulationInput::default()).unwrap();

    assert_eq!(outcome.prediction.label, "Leader");
    assert_eq!(outcome.prediction.tier, Tier::Leader);
    assert_eq!(outcome.presentation.treatment, Treatment::Success);
    assert!(outcome.presentation.celebrate);
    assert_eq!(classifier.seen.lock().unwrap().len(), 1);
}

#[test]
fn laggard_gets_error_treatment() {
    let engine = engine_with(Scripted::new("Laggard"));
    let outcome = engine
        .analyze(&SimulationInput::clamped(0, 0, 0, 0.0, 0.0))
        .unwrap();
    assert_eq!(outcome.prediction.tier, Tier::Laggard);
    assert_eq!(outcome.presentation.treatment, Treatment::Error);
    assert!(!outcome.presentation.celebrate);
}

#[test]
fn average_gets_warning_treatment() {
    let engine = engine_with(Scripted::new("Average"));
    let outcome = engine.analyze(&SimulationInput::default()).unwrap();
    assert_eq!(outcome.prediction.tier, Tier::Average);
    assert_eq!(outcome.presentation.treatment, Treatment::Warning);
}

#[test]
fn unknown_label_is_shown_verbatim_as_average() {
    let engine = engine_with(Scripted::new("leader"));
    let outcome = engine.analyze(&SimulationInput::default()).unwrap();
    assert_eq!(outcome.prediction.label, "leader");
    assert_eq!(outcome.prediction.tier, Tier::Average);
    assert_eq!(outcome.presentation.treatment, Treatment::Warning);
}

#[test]
fn classifier_sees_the_projected_row() {
    let classifier = Scripted::new("Average");
    let engine = engine_with(classifier.clone());
    let outcome = engine
        .analyze(&SimulationInput::clamped(10, 20, 30, 40.0, 50.0))
        .unwrap();

    let seen = classifier.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[outcome.features.values().to_vec()]);
    assert_eq!(seen[0][8], 10.0);
    assert_eq!(seen[0][11], 50.0);
}

#[test]
fn inference_failures_propagate() {
    let engine = engine_with(Arc::new(Failing));
    let err = engine.analyze(&SimulationInput::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::Inference(InferenceError::Backend("runtime crashed".to_string()))
    );
}

#[test]
fn bundled_model_separates_the_tiers() -> anyhow::Result<()> {
    let engine = common::fixture_engine()?;
    let cases = [
        (SimulationInput::default(), Tier::Leader),
        (SimulationInput::clamped(0, 0, 0, 0.0, 0.0), Tier::Laggard),
        (SimulationInput::clamped(100, 100, 100, 0.0, 0.0), Tier::Leader),
        (SimulationInput::clamped(50, 60, 60, 250.0, 1200.0), Tier::Average),
    ];
    for (input, tier) in cases {
        assert_eq!(engine.analyze(&input)?.prediction.tier, tier, "{input:?}");
    }
    Ok(())
}

#[test]
fn repeated_analysis_is_stable() -> anyhow::Result<()> {
    let engine = common::fixture_engine()?;
    let input = SimulationInput::clamped(62, 48, 71, 310.0, 900.0);
    let first = engine.analyze(&input)?;
    for _ in 0..10 {
        assert_eq!(engine.analyze(&input)?, first);
    }
    Ok(())
}
