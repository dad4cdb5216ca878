//! Error taxonomy for the scoring pipeline

use thiserror::Error;

/// Errors surfaced by classifier loading, input validation, and scoring.
///
/// `ModelLoad` is fatal at startup: no scoring request can be served without
/// a loaded classifier. `Schema` and `Inference` are fatal to a single
/// request only; the process and the loaded model remain usable for the
/// next submission. `Validation` never reaches the scoring path at all;
/// it is raised at the input boundary.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// Classifier artifact missing or corrupt
    #[error("failed to load classifier model: {0}")]
    ModelLoad(String),

    /// Classifier output does not match the trained two-class contract.
    /// Indicates a model/feature mismatch, i.e. a configuration fault.
    #[error("classifier output schema mismatch: {0}")]
    Schema(String),

    /// Unexpected failure inside a classifier call
    #[error("inference failed: {0}")]
    Inference(String),

    /// Raw transaction field outside its documented range
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
}

impl ScoringError {
    /// Create a validation error for a named input field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ScoringError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors that abort a single submission but not the process.
    pub fn is_request_scoped(&self) -> bool {
        matches!(
            self,
            ScoringError::Schema(_) | ScoringError::Inference(_) | ScoringError::Validation { .. }
        )
    }
}
