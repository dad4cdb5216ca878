//! Classifier abstraction over the loaded ONNX model

use crate::error::ScoringError;
use crate::features::FeatureVector;
use crate::model::loader::{LoadedModel, ModelLoader};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

/// Capability set of the trained classifier.
///
/// Both outputs come from the model itself: `predict` applies the model's
/// internal decision boundary, which is not required to agree with a 0.5
/// cut on `predict_proba`. The evaluator treats them as independent.
pub trait Classifier {
    /// Binary class label for the feature vector (0 = legitimate, 1 = fraud).
    fn predict(&self, features: &FeatureVector) -> Result<i64, ScoringError>;

    /// Per-class probabilities for the feature vector, fraud class at index 1.
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ScoringError>;
}

/// Classifier backed by an ONNX Runtime session.
///
/// The session needs exclusive access per inference call, so it sits behind
/// a lock; the public surface stays `&self` and the loaded graph is never
/// modified after construction.
pub struct OnnxClassifier {
    model: RwLock<LoadedModel>,
}

impl OnnxClassifier {
    /// Load the classifier artifact from `path`.
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self, ScoringError> {
        let loader = ModelLoader::with_threads(onnx_threads)?;
        let model = loader.load(path)?;
        Ok(Self {
            model: RwLock::new(model),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ScoringError> {
        let mut guard = self
            .model
            .write()
            .map_err(|e| ScoringError::Inference(format!("model lock poisoned: {e}")))?;
        let model = &mut *guard;

        let label_name = required_output(model.label_output.as_ref(), "label")?;

        let input = feature_tensor(features)?;
        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input])
            .map_err(|e| ScoringError::Inference(format!("classifier call failed: {e}")))?;

        let output = outputs.get(label_name.as_str()).ok_or_else(|| {
            ScoringError::Schema(format!("label output {label_name:?} missing from results"))
        })?;

        let (shape, data) = output.try_extract_tensor::<i64>().map_err(|e| {
            ScoringError::Schema(format!("label output is not an int64 tensor: {e}"))
        })?;

        if data.len() != 1 {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return Err(ScoringError::Schema(format!(
                "expected a single label, got tensor of shape {dims:?}"
            )));
        }

        let label = data[0];
        debug!(label, "Extracted classifier label");
        Ok(label)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ScoringError> {
        let mut guard = self
            .model
            .write()
            .map_err(|e| ScoringError::Inference(format!("model lock poisoned: {e}")))?;
        let model = &mut *guard;

        let proba_name = required_output(model.proba_output.as_ref(), "probability")?;

        let input = feature_tensor(features)?;
        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input])
            .map_err(|e| ScoringError::Inference(format!("classifier call failed: {e}")))?;

        let output = outputs.get(proba_name.as_str()).ok_or_else(|| {
            ScoringError::Schema(format!(
                "probability output {proba_name:?} missing from results"
            ))
        })?;

        // Plain tensor form (export with zipmap disabled).
        if let Ok(tensor) = output.try_extract_tensor::<f32>() {
            let (shape, data) = tensor;
            let probabilities = probabilities_from_tensor(&shape, data)?;
            debug!(p0 = probabilities[0], p1 = probabilities[1], "Extracted from tensor");
            return Ok(probabilities);
        }

        // seq(map(int64, float)) form, the default for sklearn-API exports.
        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            let probabilities = probabilities_from_sequence_map(output)?;
            debug!(p0 = probabilities[0], p1 = probabilities[1], "Extracted from seq(map)");
            return Ok(probabilities);
        }

        Err(ScoringError::Schema(
            "probability output is neither a float tensor nor seq(map)".to_string(),
        ))
    }
}

/// Resolve an output the export must carry.
///
/// The loader leaves a missing output as `None` so startup can still report
/// the rest of the graph; the first inference that needs it fails here with
/// a schema fault instead.
fn required_output(name: Option<&String>, what: &str) -> Result<String, ScoringError> {
    name.cloned()
        .ok_or_else(|| ScoringError::Schema(format!("classifier export has no {what} output")))
}

/// Build the `[1, FEATURE_COUNT]` input tensor from the feature projection.
fn feature_tensor(features: &FeatureVector) -> Result<Tensor<f32>, ScoringError> {
    let shape = vec![1_i64, FeatureVector::FEATURE_COUNT as i64];
    let data: Vec<f32> = features.to_array().iter().map(|&v| v as f32).collect();

    Tensor::from_array((shape, data))
        .map_err(|e| ScoringError::Inference(format!("failed to build input tensor: {e}")))
}

/// Read a two-class probability row out of a `[1, 2]` (or `[2]`) tensor.
fn probabilities_from_tensor(
    shape: &ort::tensor::Shape,
    data: &[f32],
) -> Result<Vec<f64>, ScoringError> {
    let dims: Vec<i64> = shape.iter().copied().collect();

    let class_count = match dims.as_slice() {
        [1, n] => *n as usize,
        [n] => *n as usize,
        _ => {
            return Err(ScoringError::Schema(format!(
                "unexpected probability tensor shape {dims:?}"
            )))
        }
    };

    if class_count != 2 || data.len() != 2 {
        return Err(ScoringError::Schema(format!(
            "expected a two-class probability output, got {class_count} classes"
        )));
    }

    Ok(vec![data[0] as f64, data[1] as f64])
}

/// Read the two class probabilities out of a zipmap `seq(map(int64, float))`.
fn probabilities_from_sequence_map(output: &DynValue) -> Result<Vec<f64>, ScoringError> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| ScoringError::Schema(format!("failed to downcast to sequence: {e}")))?;

    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| ScoringError::Schema(format!("failed to extract sequence: {e}")))?;

    let map_value = maps
        .first()
        .ok_or_else(|| ScoringError::Schema("empty probability sequence".to_string()))?;

    let kv_pairs = map_value
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| ScoringError::Schema(format!("failed to extract class map: {e}")))?;

    let p0 = kv_pairs.iter().find(|(class, _)| *class == 0).map(|&(_, p)| p);
    let p1 = kv_pairs.iter().find(|(class, _)| *class == 1).map(|&(_, p)| p);

    match (p0, p1) {
        (Some(p0), Some(p1)) if kv_pairs.len() == 2 => Ok(vec![p0 as f64, p1 as f64]),
        _ => Err(ScoringError::Schema(format!(
            "expected classes {{0, 1}} in probability map, got {} entries",
            kv_pairs.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ort::tensor::Shape;

    #[test]
    fn test_required_output_resolves_discovered_name() {
        let name = Some("output_label".to_string());
        let resolved = required_output(name.as_ref(), "label").unwrap();
        assert_eq!(resolved, "output_label");
    }

    #[test]
    fn test_missing_label_output_is_schema_fault() {
        let err = required_output(None, "label").unwrap_err();
        assert!(matches!(err, ScoringError::Schema(_)));
        assert!(err.to_string().contains("no label output"));
    }

    #[test]
    fn test_probabilities_from_row_tensor() {
        let shape = Shape::new([1, 2]);
        let probabilities = probabilities_from_tensor(&shape, &[0.25, 0.75]).unwrap();
        assert_eq!(probabilities, vec![0.25, 0.75]);
    }

    #[test]
    fn test_probabilities_from_flat_tensor() {
        let shape = Shape::new([2]);
        let probabilities = probabilities_from_tensor(&shape, &[0.5, 0.5]).unwrap();
        assert_eq!(probabilities, vec![0.5, 0.5]);
    }

    #[test]
    fn test_three_class_tensor_is_schema_fault() {
        let shape = Shape::new([1, 3]);
        let err = probabilities_from_tensor(&shape, &[0.2, 0.3, 0.5]).unwrap_err();
        assert!(matches!(err, ScoringError::Schema(_)));
        assert!(err.to_string().contains("3 classes"));
    }

    #[test]
    fn test_single_class_tensor_is_schema_fault() {
        let shape = Shape::new([1, 1]);
        let err = probabilities_from_tensor(&shape, &[1.0]).unwrap_err();
        assert!(matches!(err, ScoringError::Schema(_)));
    }

    #[test]
    fn test_higher_rank_tensor_is_schema_fault() {
        let shape = Shape::new([1, 2, 1]);
        let err = probabilities_from_tensor(&shape, &[0.5, 0.5]).unwrap_err();
        assert!(err.to_string().contains("unexpected probability tensor shape"));
    }
}
