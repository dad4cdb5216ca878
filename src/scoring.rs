//! Risk evaluation: classifier outputs to a final verdict

use crate::error::ScoringError;
use crate::features::FeatureVector;
use crate::model::Classifier;
use crate::types::{AnalysisReport, RawTransaction, Recommendation};
use tracing::debug;

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Probability of the fraud class, taken verbatim from the classifier.
    pub fraud_probability: f64,
    /// The classifier's own label decision.
    pub is_fraud: bool,
    /// Action derived from the label.
    pub recommendation: Recommendation,
}

impl ScoreResult {
    /// Attach transaction context and diagnostics to produce the full report.
    pub fn into_report(self, tx: &RawTransaction, features: &FeatureVector) -> AnalysisReport {
        AnalysisReport::new(self.fraud_probability, self.is_fraud, self.recommendation)
            .with_transaction(tx.tx_type, tx.amount)
            .with_error_balances(
                features.error_balance_sender,
                features.error_balance_receiver,
            )
    }
}

/// Scores feature vectors against a classifier and maps labels to actions.
///
/// The label and the probability are separate model outputs and are kept
/// independent here: a gradient-boosted ensemble's decision boundary does
/// not have to sit at 0.5, so the verdict follows the label even when the
/// probability lands on the other side of one half.
pub struct RiskEvaluator<C: Classifier> {
    classifier: C,
}

impl<C: Classifier> RiskEvaluator<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Score one feature vector.
    ///
    /// Asks the classifier for both capability outputs. A classifier that
    /// does not expose a two-class probability row or a binary label is a
    /// schema fault in the deployed artifact, not a bad transaction.
    pub fn evaluate(&self, features: &FeatureVector) -> Result<ScoreResult, ScoringError> {
        let probabilities = self.classifier.predict_proba(features)?;
        if probabilities.len() != 2 {
            return Err(ScoringError::Schema(format!(
                "expected two class probabilities, got {}",
                probabilities.len()
            )));
        }
        let fraud_probability = probabilities[1];

        let label = self.classifier.predict(features)?;
        let is_fraud = match label {
            0 => false,
            1 => true,
            other => {
                return Err(ScoringError::Schema(format!(
                    "classifier returned label {other}, expected 0 or 1"
                )))
            }
        };

        let recommendation = Recommendation::from_label(is_fraud);
        debug!(fraud_probability, is_fraud, "Scored feature vector");

        Ok(ScoreResult {
            fraud_probability,
            is_fraud,
            recommendation,
        })
    }
}
