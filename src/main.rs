//! PaySim Fraud Scoring Console - Main Entry Point
//!
//! Loads the exported ONNX classifier and runs the interactive scoring form
//! over stdin/stdout. Logs go to stderr so the form stays readable.

use anyhow::{Context, Result};
use paysim_fraud_console::{
    config::{AppConfig, ConfigSource},
    console::ScoringConsole,
    model::OnnxClassifier,
    scoring::RiskEvaluator,
};
use std::io;
use tracing::info;

fn main() -> Result<()> {
    let (config, config_source) = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("paysim_fraud_console={}", config.logging.level).parse()?,
            ),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting PaySim fraud scoring console");
    match &config_source {
        ConfigSource::File(path) => info!(path = %path.display(), "Loaded config file"),
        ConfigSource::Defaults => info!("No config file found, using defaults"),
    }
    info!(
        model_path = %config.model.path,
        onnx_threads = config.model.onnx_threads,
        "Configuration loaded"
    );

    // No classifier, nothing to score: a load failure is fatal.
    let classifier = OnnxClassifier::load(&config.model.path, config.model.onnx_threads)
        .context("failed to load the fraud classifier")?;
    info!("Classifier loaded");

    let evaluator = RiskEvaluator::new(classifier);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = ScoringConsole::new(evaluator, config.form, stdin.lock(), stdout.lock());
    console.run().context("console session failed")?;

    Ok(())
}
