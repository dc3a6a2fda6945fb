//! Data contracts shared by the ESG analysis core and the dashboard client.
//!
//! Nothing in here touches artifacts or the terminal; these are the plain
//! records that flow between the input controls, the feature builder and the
//! result panel.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const PILLAR_MIN: u8 = 0;
pub const PILLAR_MAX: u8 = 100;

pub const DEFAULT_GOVERNANCE: u8 = 75;
pub const DEFAULT_SOCIAL: u8 = 60;
pub const DEFAULT_ENVIRONMENTAL: u8 = 65;
pub const DEFAULT_CARBON_FOOTPRINT: f64 = 250.0;
pub const DEFAULT_ENERGY_CONSUMPTION: f64 = 1200.0;

/// Column names the classifier was trained with for the five simulated inputs.
pub mod feature_names {
    pub const GOVERNANCE: &str = "ESG_Governance";
    pub const SOCIAL: &str = "ESG_Social";
    pub const ENVIRONMENTAL: &str = "ESG_Environmental";
    pub const CARBON_EMISSIONS: &str = "CarbonEmissions";
    pub const ENERGY_CONSUMPTION: &str = "EnergyConsumption";

    /// Every column the input mapping writes, in mapping order.
    pub const MAPPED: [&str; 5] = [
        GOVERNANCE,
        SOCIAL,
        ENVIRONMENTAL,
        CARBON_EMISSIONS,
        ENERGY_CONSUMPTION,
    ];
}

/// One of the three ESG pillars shown on the radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pillar {
    Governance,
    Social,
    Environmental,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::Governance, Pillar::Social, Pillar::Environmental];

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Governance => "Governance",
            Pillar::Social => "Social",
            Pillar::Environmental => "Environmental",
        }
    }

    pub fn feature_name(self) -> &'static str {
        match self {
            Pillar::Governance => feature_names::GOVERNANCE,
            Pillar::Social => feature_names::SOCIAL,
            Pillar::Environmental => feature_names::ENVIRONMENTAL,
        }
    }
}

/// Clamp an arbitrary integer into the pillar score range.
pub fn clamp_pillar(value: i64) -> u8 {
    value.clamp(PILLAR_MIN as i64, PILLAR_MAX as i64) as u8
}

/// A single analysis request assembled from the current control values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub governance: u8,
    pub social: u8,
    pub environmental: u8,
    pub carbon_footprint: f64,
    pub energy_consumption: f64,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            governance: DEFAULT_GOVERNANCE,
            social: DEFAULT_SOCIAL,
            environmental: DEFAULT_ENVIRONMENTAL,
            carbon_footprint: DEFAULT_CARBON_FOOTPRINT,
            energy_consumption: DEFAULT_ENERGY_CONSUMPTION,
        }
    }
}

impl SimulationInput {
    /// Build an input, saturating the pillar scores at `[0, 100]`.
    ///
    /// The two impact metrics are taken verbatim.
    pub fn clamped(
        governance: i64,
        social: i64,
        environmental: i64,
        carbon_footprint: f64,
        energy_consumption: f64,
    ) -> Self {
        Self {
            governance: clamp_pillar(governance),
            social: clamp_pillar(social),
            environmental: clamp_pillar(environmental),
            carbon_footprint,
            energy_consumption,
        }
    }

    pub fn pillar(&self, pillar: Pillar) -> u8 {
        match pillar {
            Pillar::Governance => self.governance,
            Pillar::Social => self.social,
            Pillar::Environmental => self.environmental,
        }
    }

    pub fn with_pillar(mut self, pillar: Pillar, value: i64) -> Self {
        let value = clamp_pillar(value);
        match pillar {
            Pillar::Governance => self.governance = value,
            Pillar::Social => self.social = value,
            Pillar::Environmental => self.environmental = value,
        }
        self
    }

    /// Values for the five mapped feature columns, paired with their names.
    pub fn mapped_features(&self) -> [(&'static str, f64); 5] {
        [
            (feature_names::GOVERNANCE, self.governance as f64),
            (feature_names::SOCIAL, self.social as f64),
            (feature_names::ENVIRONMENTAL, self.environmental as f64),
            (feature_names::CARBON_EMISSIONS, self.carbon_footprint),
            (feature_names::ENERGY_CONSUMPTION, self.energy_consumption),
        ]
    }
}

/// Overall sustainability standing predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Leader,
    Average,
    Laggard,
}

impl Tier {
    /// Interpret a classifier label.
    ///
    /// Only the literal `"Leader"` and `"Laggard"` are special; every other
    /// label, including `"Average"`, lands on [`Tier::Average`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Leader" => Tier::Leader,
            "Laggard" => Tier::Laggard,
            _ => Tier::Average,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Leader => "Leader",
            Tier::Average => "Average",
            Tier::Laggard => "Laggard",
        }
    }

    /// True when `label` is one of the three labels the classifier is known to emit.
    pub fn is_known_label(label: &str) -> bool {
        matches!(label, "Leader" | "Average" | "Laggard")
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual treatment applied to a predicted tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Treatment {
    Success,
    Warning,
    Error,
}

impl Treatment {
    pub fn as_str(self) -> &'static str {
        match self {
            Treatment::Success => "success",
            Treatment::Warning => "warning",
            Treatment::Error => "error",
        }
    }
}

/// How the result panel should present a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub treatment: Treatment,
    pub celebrate: bool,
}

/// Label returned by the classifier together with its interpreted tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub tier: Tier,
}

impl PredictionResult {
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let tier = Tier::from_label(&label);
        Self { label, tier }
    }
}
