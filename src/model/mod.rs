//! Classifier loading and inference

pub mod classifier;
pub mod loader;

pub use classifier::{Classifier, OnnxClassifier};
pub use loader::{LoadedModel, ModelLoader};
