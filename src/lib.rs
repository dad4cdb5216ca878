//! PaySim Fraud Scoring Console Library
//!
//! Deterministic feature engineering and ONNX classifier inference for
//! PaySim-style TRANSFER and CASH_OUT transactions, plus the interactive
//! form that fronts them.

pub mod config;
pub mod console;
pub mod error;
pub mod features;
pub mod model;
pub mod scoring;
pub mod stats;
pub mod types;

pub use config::{AppConfig, ConfigSource};
pub use console::ScoringConsole;
pub use error::ScoringError;
pub use features::{FeatureBuilder, FeatureVector};
pub use model::{Classifier, OnnxClassifier};
pub use scoring::{RiskEvaluator, ScoreResult};
pub use stats::SessionStats;
pub use types::{AnalysisReport, RawTransaction, Recommendation, TransactionType};
