use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use esg_core::{
    load_dashboard_config, load_dashboard_config_from_env, AnalysisEngine, AnalysisOutcome,
    ArtifactPaths, SimulationInput, Theme, Tier, Treatment,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod controls;
mod ui;

use app::DashboardApp;

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "ESG tier simulator dashboard", long_about = None)]
struct Cli {
    /// Trained classifier artifact (JSON).
    #[arg(long, env = "ESG_MODEL_PATH")]
    model: Option<PathBuf>,
    /// Ordered feature column list the classifier was trained on (JSON array).
    #[arg(long, env = "ESG_FEATURES_PATH")]
    features: Option<PathBuf>,
    /// Dashboard configuration file. Defaults to `ESG_DASHBOARD_CONFIG_PATH`,
    /// then the bundled config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Visual theme, overriding the configured one (flat or glass).
    #[arg(long, value_parser = parse_theme)]
    theme: Option<Theme>,
    /// Analyze once without the terminal UI and print the result.
    #[arg(long)]
    once: bool,
    /// With --once, print the result as JSON.
    #[arg(long, requires = "once")]
    json: bool,
    #[arg(long, requires = "once", allow_negative_numbers = true)]
    governance: Option<i64>,
    #[arg(long, requires = "once", allow_negative_numbers = true)]
    social: Option<i64>,
    #[arg(long, requires = "once", allow_negative_numbers = true)]
    environmental: Option<i64>,
    #[arg(long, requires = "once", allow_negative_numbers = true)]
    carbon: Option<f64>,
    #[arg(long, requires = "once", allow_negative_numbers = true)]
    energy: Option<f64>,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::parse(value).ok_or_else(|| format!("unknown theme '{value}' (expected flat or glass)"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_receiver = if cli.once {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        None
    } else {
        let (log_tx, log_rx) = mpsc::channel::<String>();
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .compact()
            .with_ansi(false)
            .with_writer(move || ChannelWriter {
                sender: log_tx.clone(),
            })
            .init();
        Some(log_rx)
    };

    let (config, metadata) = match cli.config.clone() {
        Some(path) => load_dashboard_config(Some(path)),
        None => load_dashboard_config_from_env(),
    };
    match metadata.path() {
        Some(path) => info!(config = %path.display(), "Dashboard config loaded"),
        None => info!("Using builtin dashboard config"),
    }
    let theme = cli.theme.unwrap_or(config.theme);
    let paths = ArtifactPaths::resolve(
        [cli.model.clone(), config.artifacts.model_path.clone()],
        [cli.features.clone(), config.artifacts.features_path.clone()],
    );

    let engine = AnalysisEngine::load(&paths)?;

    match log_receiver {
        None => run_once(&cli, &engine, config.defaults.to_input()),
        Some(log_rx) => {
            info!(?theme, "Dashboard ready. Press a to analyze, q to exit.");
            let app = DashboardApp::new(engine, &config, theme, log_rx)?;
            app.run()
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[derive(Serialize)]
struct OnceReport<'a> {
    label: &'a str,
    tier: Tier,
    treatment: Treatment,
    celebrate: bool,
    input: SimulationInput,
    features: Vec<FeatureEntry<'a>>,
}

#[derive(Serialize)]
struct FeatureEntry<'a> {
    name: &'a str,
    value: f64,
}

impl<'a> OnceReport<'a> {
    fn new(outcome: &'a AnalysisOutcome) -> Self {
        Self {
            label: &outcome.prediction.label,
            tier: outcome.prediction.tier,
            treatment: outcome.presentation.treatment,
            celebrate: outcome.presentation.celebrate,
            input: outcome.input,
            features: outcome
                .features
                .iter()
                .map(|(name, value)| FeatureEntry { name, value })
                .collect(),
        }
    }
}

fn run_once(cli: &Cli, engine: &AnalysisEngine, defaults: SimulationInput) -> Result<()> {
    let input = SimulationInput::clamped(
        cli.governance.unwrap_or(defaults.governance as i64),
        cli.social.unwrap_or(defaults.social as i64),
        cli.environmental.unwrap_or(defaults.environmental as i64),
        cli.carbon.unwrap_or(defaults.carbon_footprint),
        cli.energy.unwrap_or(defaults.energy_consumption),
    );
    if !input.carbon_footprint.is_finite() || !input.energy_consumption.is_finite() {
        return Err(eyre!("impact metrics must be finite numbers"));
    }

    let outcome = engine.analyze(&input)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&OnceReport::new(&outcome))?);
    } else {
        println!(
            "label={} tier={} treatment={} celebrate={}",
            outcome.prediction.label,
            outcome.prediction.tier,
            outcome.presentation.treatment.as_str(),
            outcome.presentation.celebrate
        );
    }
    Ok(())
}
