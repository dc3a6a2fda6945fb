//! Configuration for the ESG dashboard.
//!
//! Loaded from `dashboard_config.json` with support for environment variable overrides.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use esg_schema::{
    SimulationInput, DEFAULT_CARBON_FOOTPRINT, DEFAULT_ENERGY_CONSUMPTION, DEFAULT_ENVIRONMENTAL,
    DEFAULT_GOVERNANCE, DEFAULT_SOCIAL,
};
use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_DASHBOARD_CONFIG: &str = include_str!("data/dashboard_config.json");

/// Root configuration for the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub theme: Theme,
    pub defaults: InputDefaults,
    pub controls: ControlsConfig,
    pub celebration: CelebrationConfig,
    pub artifacts: ArtifactOverrides,
}

/// Visual theme. `Flat` is a plain light background, `Glass` a dark backdrop
/// with rounded translucent-looking panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Flat,
    Glass,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Some(Theme::Flat),
            "glass" => Some(Theme::Glass),
            _ => None,
        }
    }
}

/// Starting values for the five input controls.
///
/// Pillar values outside `[0, 100]` are clamped when the input is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub governance: i64,
    pub social: i64,
    pub environmental: i64,
    pub carbon_footprint: f64,
    pub energy_consumption: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            governance: DEFAULT_GOVERNANCE as i64,
            social: DEFAULT_SOCIAL as i64,
            environmental: DEFAULT_ENVIRONMENTAL as i64,
            carbon_footprint: DEFAULT_CARBON_FOOTPRINT,
            energy_consumption: DEFAULT_ENERGY_CONSUMPTION,
        }
    }
}

impl InputDefaults {
    pub fn to_input(&self) -> SimulationInput {
        SimulationInput::clamped(
            self.governance,
            self.social,
            self.environmental,
            self.carbon_footprint,
            self.energy_consumption,
        )
    }
}

/// Step sizes for keyboard adjustments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub slider_step: u8,
    pub slider_coarse_step: u8,
    pub metric_step: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            slider_step: 1,
            slider_coarse_step: 10,
            metric_step: 10.0,
        }
    }
}

/// Banner animation shown for a Leader result.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CelebrationConfig {
    pub enabled: bool,
    pub duration_ms: u64,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 2500,
        }
    }
}

/// Artifact locations; unset entries fall back to the bundled artifacts.
///
/// Relative paths in a config file are relative to that file's directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtifactOverrides {
    pub model_path: Option<PathBuf>,
    pub features_path: Option<PathBuf>,
}

impl ArtifactOverrides {
    fn anchor_to(&mut self, base: &Path) {
        for path in [&mut self.model_path, &mut self.features_path]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardConfigError {
    #[error("failed to parse dashboard config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read dashboard config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DashboardConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_DASHBOARD_CONFIG)
                .expect("builtin dashboard config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, DashboardConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| DashboardConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = DashboardConfig::from_json_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.artifacts.anchor_to(dir);
        }
        Ok(config)
    }
}

/// Metadata about the dashboard configuration source.
#[derive(Debug, Clone)]
pub struct DashboardConfigMetadata {
    path: Option<PathBuf>,
}

impl DashboardConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load dashboard configuration from `override_path`, or the default path.
///
/// Falls back to the builtin config when the file cannot be read or parsed.
pub fn load_dashboard_config(
    override_path: Option<PathBuf>,
) -> (Arc<DashboardConfig>, DashboardConfigMetadata) {
    let default_path =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/dashboard_config.json");
    let path = override_path.unwrap_or(default_path);

    match DashboardConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "esg::config",
                path = %path.display(),
                "dashboard_config.loaded=file"
            );
            return (Arc::new(config), DashboardConfigMetadata::new(Some(path)));
        }
        Err(err) => {
            tracing::warn!(
                target: "esg::config",
                path = %path.display(),
                error = %err,
                "dashboard_config.load_failed"
            );
        }
    }

    let config = DashboardConfig::builtin();
    tracing::info!(target: "esg::config", "dashboard_config.loaded=builtin");
    (config, DashboardConfigMetadata::new(None))
}

/// Load dashboard configuration from `ESG_DASHBOARD_CONFIG_PATH` or the default path.
pub fn load_dashboard_config_from_env() -> (Arc<DashboardConfig>, DashboardConfigMetadata) {
    let override_path = env::var("ESG_DASHBOARD_CONFIG_PATH").ok().map(PathBuf::from);
    load_dashboard_config(override_path)
}
