//! Projection of a [`SimulationInput`] onto the classifier's column layout.

use std::{fmt, sync::Arc};

use esg_schema::{feature_names, SimulationInput};
use thiserror::Error;

use crate::feature_schema::FeatureSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("feature schema is missing mapped columns: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<&'static str> },
}

/// One row of model input, columns in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build a row directly from a schema and matching values.
    ///
    /// Returns `None` when the lengths disagree.
    pub fn from_values(schema: &FeatureSchema, values: Vec<f64>) -> Option<Self> {
        (schema.len() == values.len()).then(|| Self {
            names: schema.shared_names(),
            values,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (name, value)) in self.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Assemble the classifier row for `input`.
///
/// Every schema column starts at `0.0`; the five mapped columns take the input
/// values. Fails when any mapped column is absent from the schema.
pub fn build_feature_vector(
    input: &SimulationInput,
    schema: &FeatureSchema,
) -> Result<FeatureVector, FeatureError> {
    let missing: Vec<&'static str> = feature_names::MAPPED
        .into_iter()
        .filter(|name| !schema.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(FeatureError::SchemaMismatch { missing });
    }

    let mapped = input.mapped_features();
    let values = schema
        .names()
        .iter()
        .map(|column| {
            mapped
                .iter()
                .find(|(name, _)| *name == column.as_str())
                .map(|(_, value)| *value)
                .unwrap_or(0.0)
        })
        .collect();

    Ok(FeatureVector {
        names: schema.shared_names(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn small_schema() -> FeatureSchema {
        FeatureSchema::new([
            "Year",
            "ESG_Governance",
            "CarbonEmissions",
            "ESG_Social",
            "WaterUsage",
            "EnergyConsumption",
            "ESG_Environmental",
        ])
        .unwrap()
    }

    #[test]
    fn default_input_fills_mapped_columns() {
        let schema = FeatureSchema::builtin().unwrap();
        let row = build_feature_vector(&SimulationInput::default(), &schema).unwrap();

        assert_eq!(row.names(), schema.names());
        assert_eq!(row.get("ESG_Governance"), Some(75.0));
        assert_eq!(row.get("ESG_Social"), Some(60.0));
        assert_eq!(row.get("ESG_Environmental"), Some(65.0));
        assert_eq!(row.get("CarbonEmissions"), Some(250.0));
        assert_eq!(row.get("EnergyConsumption"), Some(1200.0));
        for (name, value) in row.iter() {
            if !feature_names::MAPPED.contains(&name) {
                assert_eq!(value, 0.0, "unmapped column {name} should be zero");
            }
        }
    }

    #[test]
    fn row_follows_schema_order() {
        let schema = small_schema();
        let row = build_feature_vector(&SimulationInput::default(), &schema).unwrap();
        insta::assert_snapshot!(row.to_string(), @r###"
        Year=0
        ESG_Governance=75
        CarbonEmissions=250
        ESG_Social=60
        WaterUsage=0
        EnergyConsumption=1200
        ESG_Environmental=65
        "###);
    }

    #[test]
    fn missing_energy_column_is_schema_mismatch() {
        let schema = FeatureSchema::new([
            "ESG_Governance",
            "ESG_Social",
            "ESG_Environmental",
            "CarbonEmissions",
        ])
        .unwrap();
        let err = build_feature_vector(&SimulationInput::default(), &schema).unwrap_err();
        assert_eq!(
            err,
            FeatureError::SchemaMismatch {
                missing: vec!["EnergyConsumption"]
            }
        );
    }

    #[test]
    fn mismatch_lists_every_missing_column() {
        let schema = FeatureSchema::new(["Year", "ESG_Social"]).unwrap();
        let FeatureError::SchemaMismatch { missing } =
            build_feature_vector(&SimulationInput::default(), &schema).unwrap_err();
        assert_eq!(
            missing,
            vec![
                "ESG_Governance",
                "ESG_Environmental",
                "CarbonEmissions",
                "EnergyConsumption"
            ]
        );
    }

    #[test]
    fn sampled_inputs_keep_layout_and_values() {
        let schema = FeatureSchema::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let input = SimulationInput::clamped(
                rng.gen_range(0..=100),
                rng.gen_range(0..=100),
                rng.gen_range(0..=100),
                rng.gen_range(-1.0e6..1.0e6),
                rng.gen_range(-1.0e6..1.0e6),
            );
            let row = build_feature_vector(&input, &schema).unwrap();
            assert_eq!(row.names(), schema.names());
            assert_eq!(row.get("ESG_Governance"), Some(input.governance as f64));
            assert_eq!(row.get("ESG_Social"), Some(input.social as f64));
            assert_eq!(row.get("ESG_Environmental"), Some(input.environmental as f64));
            assert_eq!(row.get("CarbonEmissions"), Some(input.carbon_footprint));
            assert_eq!(row.get("EnergyConsumption"), Some(input.energy_consumption));

            let again = build_feature_vector(&input, &schema).unwrap();
            assert_eq!(row, again);
        }
    }

    #[test]
    fn from_values_checks_width() {
        let schema = small_schema();
        assert!(FeatureVector::from_values(&schema, vec![0.0; 3]).is_none());
        let row = FeatureVector::from_values(&schema, vec![1.0; 7]).unwrap();
        assert_eq!(row.len(), 7);
    }
}
