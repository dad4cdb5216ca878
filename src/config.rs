//! Configuration management for the fraud scoring console

use crate::types::TransactionType;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the effective configuration came from.
///
/// Loading happens before the log subscriber is installed (the subscriber
/// needs the configured level), so the loader reports the source instead of
/// logging it and the caller logs once tracing is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the file at this path.
    File(PathBuf),
    /// Built-in defaults; no file was present.
    Defaults,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub form: FormDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the exported ONNX classifier
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Pre-filled values for the interactive form.
///
/// These describe a typical mid-size transfer and match the starting values
/// analysts are used to seeing in the scoring UI.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDefaults {
    /// Hour of the simulation month (1-744)
    #[serde(default = "default_time_step")]
    pub time_step: u32,
    /// Transaction type offered when the analyst just presses enter
    #[serde(default = "default_tx_type")]
    pub tx_type: TransactionType,
    /// Transaction amount
    #[serde(default = "default_amount")]
    pub amount: f64,
    /// Sender balance before the transaction
    #[serde(default = "default_sender_before")]
    pub sender_balance_before: f64,
    /// Sender balance after the transaction
    #[serde(default = "default_sender_after")]
    pub sender_balance_after: f64,
    /// Receiver balance before the transaction
    #[serde(default)]
    pub receiver_balance_before: f64,
    /// Receiver balance after the transaction
    #[serde(default = "default_receiver_after")]
    pub receiver_balance_after: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_model_path() -> String {
    "models/fraud_detector_xgb.onnx".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

fn default_time_step() -> u32 {
    1
}

fn default_tx_type() -> TransactionType {
    TransactionType::Transfer
}

fn default_amount() -> f64 {
    50_000.0
}

fn default_sender_before() -> f64 {
    100_000.0
}

fn default_sender_after() -> f64 {
    50_000.0
}

fn default_receiver_after() -> f64 {
    50_000.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file is present.
    pub fn load() -> Result<(Self, ConfigSource)> {
        Self::load_or_default("config/config.toml")
    }

    /// Load from `path` if it exists, otherwise return the defaults.
    ///
    /// A missing file is normal (the defaults are complete); a file that
    /// exists but does not parse is a real fault and is reported.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults));
        }
        let config = Self::load_from_path(path)?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            form: FormDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            tx_type: default_tx_type(),
            amount: default_amount(),
            sender_balance_before: default_sender_before(),
            sender_balance_after: default_sender_after(),
            receiver_balance_before: 0.0,
            receiver_balance_after: default_receiver_after(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
