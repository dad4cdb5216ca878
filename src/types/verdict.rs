//! Scoring verdict data structures

use crate::types::transaction::TransactionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action recommended for a scored transaction.
///
/// Derived from the classifier's binary label, never re-derived from the
/// probability: the model carries its own decision boundary, which need not
/// sit at 0.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    BlockAndInvestigate,
    Allow,
}

impl Recommendation {
    /// Map the classifier label to an action.
    pub fn from_label(is_fraud: bool) -> Self {
        if is_fraud {
            Recommendation::BlockAndInvestigate
        } else {
            Recommendation::Allow
        }
    }

    /// Canonical spelling, matching the serialized form; used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::BlockAndInvestigate => "BLOCK_AND_INVESTIGATE",
            Recommendation::Allow => "ALLOW",
        }
    }

    /// Sentence rendered on the form surface.
    pub fn action_text(&self) -> &'static str {
        match self {
            Recommendation::BlockAndInvestigate => "Block the transaction and investigate.",
            Recommendation::Allow => "Allow the transaction to proceed.",
        }
    }
}

/// Full analysis record for one scored transaction.
///
/// Wraps the evaluator's verdict with an id, a timestamp, an echo of the
/// submitted transaction, and the error-balance diagnostics the form shows
/// for blocked transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique analysis identifier
    pub report_id: String,

    /// Analysis timestamp
    pub timestamp: DateTime<Utc>,

    /// Transaction category as submitted
    pub tx_type: TransactionType,

    /// Transacted amount as submitted
    pub amount: f64,

    /// Fraud-class probability from the classifier, in [0, 1]
    pub fraud_probability: f64,

    /// Binary decision from the classifier's own boundary
    pub is_fraud: bool,

    /// Action derived from the decision
    pub recommendation: Recommendation,

    /// Sender-side deviation from conservation of balance
    pub error_balance_sender: f64,

    /// Receiver-side deviation from conservation of balance
    pub error_balance_receiver: f64,
}

impl AnalysisReport {
    /// Create a report for a scored transaction.
    pub fn new(fraud_probability: f64, is_fraud: bool, recommendation: Recommendation) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            tx_type: TransactionType::Transfer,
            amount: 0.0,
            fraud_probability,
            is_fraud,
            recommendation,
            error_balance_sender: 0.0,
            error_balance_receiver: 0.0,
        }
    }

    /// Attach the submitted transaction's category and amount.
    pub fn with_transaction(mut self, tx_type: TransactionType, amount: f64) -> Self {
        self.tx_type = tx_type;
        self.amount = amount;
        self
    }

    /// Attach the error-balance diagnostics from the feature vector.
    pub fn with_error_balances(mut self, sender: f64, receiver: f64) -> Self {
        self.error_balance_sender = sender;
        self.error_balance_receiver = receiver;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_from_label() {
        assert_eq!(
            Recommendation::from_label(true),
            Recommendation::BlockAndInvestigate
        );
        assert_eq!(Recommendation::from_label(false), Recommendation::Allow);
    }

    #[test]
    fn test_recommendation_log_spelling() {
        assert_eq!(
            Recommendation::BlockAndInvestigate.as_str(),
            "BLOCK_AND_INVESTIGATE"
        );
        assert_eq!(Recommendation::Allow.as_str(), "ALLOW");
    }

    #[test]
    fn test_recommendation_wire_format() {
        let json = serde_json::to_string(&Recommendation::BlockAndInvestigate).unwrap();
        assert_eq!(json, "\"BLOCK_AND_INVESTIGATE\"");
        let json = serde_json::to_string(&Recommendation::Allow).unwrap();
        assert_eq!(json, "\"ALLOW\"");
    }

    #[test]
    fn test_report_serialization() {
        let report = AnalysisReport::new(0.97, true, Recommendation::BlockAndInvestigate)
            .with_transaction(TransactionType::CashOut, 50_000.0)
            .with_error_balances(0.0, 50_000.0);

        let json = serde_json::to_string(&report).unwrap();
        let deserialized: AnalysisReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.report_id, deserialized.report_id);
        assert_eq!(deserialized.fraud_probability, 0.97);
        assert!(deserialized.is_fraud);
        assert_eq!(deserialized.tx_type, TransactionType::CashOut);
        assert_eq!(deserialized.error_balance_receiver, 50_000.0);
    }
}
