//! ONNX classifier artifact loading

use crate::error::ScoringError;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{info, warn};

/// Loaded ONNX session with the discovered tensor names.
#[derive(Debug)]
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature tensor
    pub input_name: String,
    /// Output carrying the predicted class label, if the export has one
    pub label_output: Option<String>,
    /// Output carrying the class probabilities, if the export has one
    pub proba_output: Option<String>,
}

/// Loader for the classifier artifact.
pub struct ModelLoader {
    /// Number of intra-op threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a loader with default settings (1 thread).
    pub fn new() -> Result<Self, ScoringError> {
        Self::with_threads(1)
    }

    /// Create a loader with the given intra-op thread count.
    pub fn with_threads(onnx_threads: usize) -> Result<Self, ScoringError> {
        ort::init()
            .commit()
            .map_err(|e| ScoringError::ModelLoad(format!("ONNX Runtime init failed: {e}")))?;
        info!(onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the classifier from `path`.
    ///
    /// Any failure here is fatal to startup: a missing or unreadable
    /// artifact means no transaction can be scored.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel, ScoringError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScoringError::ModelLoad(format!(
                "model file not found at {}",
                path.display()
            )));
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX classifier");

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(self.onnx_threads))
            .map_err(|e| ScoringError::ModelLoad(format!("session setup failed: {e}")))?
            .commit_from_file(path)
            .map_err(|e| {
                ScoringError::ModelLoad(format!("could not load {}: {e}", path.display()))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // sklearn-style exports carry a label tensor and a probability
        // output; resolving them here keeps the per-call extraction strict.
        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let proba_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        if label_output.is_none() {
            warn!("classifier export has no output named *label*");
        }
        if proba_output.is_none() {
            warn!("classifier export has no output named *prob*");
        }

        info!(
            input = %input_name,
            label_output = ?label_output,
            proba_output = ?proba_output,
            "Classifier loaded"
        );

        Ok(LoadedModel {
            session,
            input_name,
            label_output,
            proba_output,
        })
    }
}
