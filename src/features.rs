//! Feature engineering for fraud model inference.
//!
//! This module turns a raw transaction into the exact numeric vector the
//! classifier was trained on: the same type encoding, the same
//! suspicious-zero imputation, and the same derived error-balance features
//! as the training preprocessing, emitted in the same column order.

use crate::types::transaction::RawTransaction;

/// The model's input features, one analysis per transaction.
///
/// Field order is significant: the classifier was fit on a fixed column
/// order and performs no schema check of its own, so [`FeatureVector::to_array`]
/// is the single place that order is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Hour index in the simulation window
    pub time_step: f64,
    /// Transaction type encoding (TRANSFER = 0, CASH_OUT = 1)
    pub type_code: f64,
    /// Transacted amount
    pub amount: f64,
    /// Sender balance before, as submitted
    pub sender_balance_before: f64,
    /// Sender balance after, as submitted
    pub sender_balance_after: f64,
    /// Receiver balance before, after imputation
    pub receiver_balance_before_adj: f64,
    /// Receiver balance after, after imputation
    pub receiver_balance_after_adj: f64,
    /// Sender-side deviation from conservation of balance
    pub error_balance_sender: f64,
    /// Receiver-side deviation from conservation of balance
    pub error_balance_receiver: f64,
}

impl FeatureVector {
    /// Number of model input features.
    pub const FEATURE_COUNT: usize = 9;

    /// Column names in training order, for logging and audits.
    pub const FEATURE_NAMES: [&'static str; Self::FEATURE_COUNT] = [
        "step",
        "type",
        "amount",
        "oldBalanceOrig",
        "newBalanceOrig",
        "oldBalanceDest",
        "newBalanceDest",
        "errorBalanceOrig",
        "errorBalanceDest",
    ];

    /// Project the features in training column order.
    ///
    /// The classifier input tensor is built from this array and nothing
    /// else; any reordering here silently corrupts every prediction.
    pub fn to_array(&self) -> [f64; Self::FEATURE_COUNT] {
        [
            self.time_step,
            self.type_code,
            self.amount,
            self.sender_balance_before,
            self.sender_balance_after,
            self.receiver_balance_before_adj,
            self.receiver_balance_after_adj,
            self.error_balance_sender,
            self.error_balance_receiver,
        ]
    }
}

/// Builds model input features from validated raw transactions.
///
/// Pure and deterministic: the same transaction always produces the same
/// vector, and building has no side effects.
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Sentinel written over receiver balances caught by the suspicious-zero
    /// rule. Tied to the training distribution the classifier was fit on;
    /// not configurable.
    pub const SUSPICIOUS_ZERO_SENTINEL: f64 = -1.0;

    /// Create a new feature builder.
    pub fn new() -> Self {
        Self
    }

    /// Build the ordered feature vector for one transaction.
    ///
    /// Total function: inputs are validated at the boundary, so there is no
    /// failure mode here.
    pub fn build(&self, tx: &RawTransaction) -> FeatureVector {
        let type_code = tx.tx_type.code();

        // Suspicious-zero rule: receiver accounts showing zero balance on
        // both sides of a non-zero transfer were imputed to -1 during
        // training (they correlate with fraud). The zero-amount guard keeps
        // genuinely empty, inactive accounts untouched.
        let suspicious_zero = tx.receiver_balance_before == 0.0
            && tx.receiver_balance_after == 0.0
            && tx.amount != 0.0;

        let (receiver_before_adj, receiver_after_adj) = if suspicious_zero {
            (
                Self::SUSPICIOUS_ZERO_SENTINEL,
                Self::SUSPICIOUS_ZERO_SENTINEL,
            )
        } else {
            (tx.receiver_balance_before, tx.receiver_balance_after)
        };

        // Error balances measure how far the transaction deviates from
        // conservation of balance. The sender side uses the balances as
        // submitted; the receiver side uses the imputed balances.
        let error_balance_sender =
            tx.sender_balance_after + tx.amount - tx.sender_balance_before;
        let error_balance_receiver = receiver_before_adj + tx.amount - receiver_after_adj;

        FeatureVector {
            time_step: tx.time_step as f64,
            type_code,
            amount: tx.amount,
            sender_balance_before: tx.sender_balance_before,
            sender_balance_after: tx.sender_balance_after,
            receiver_balance_before_adj: receiver_before_adj,
            receiver_balance_after_adj: receiver_after_adj,
            error_balance_sender,
            error_balance_receiver,
        }
    }

    /// Number of features produced.
    pub fn feature_count(&self) -> usize {
        FeatureVector::FEATURE_COUNT
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::TransactionType;

    fn tx(
        tx_type: TransactionType,
        amount: f64,
        sender: (f64, f64),
        receiver: (f64, f64),
    ) -> RawTransaction {
        RawTransaction::new(1, tx_type, amount, sender.0, sender.1, receiver.0, receiver.1)
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = FeatureBuilder::new();
        let tx = tx(
            TransactionType::CashOut,
            1_250.5,
            (2_000.0, 749.5),
            (300.0, 1_550.5),
        );

        assert_eq!(builder.build(&tx), builder.build(&tx));
    }

    #[test]
    fn test_type_encoding() {
        let builder = FeatureBuilder::new();

        let transfer = tx(TransactionType::Transfer, 10.0, (10.0, 0.0), (5.0, 15.0));
        assert_eq!(builder.build(&transfer).type_code, 0.0);

        let cash_out = tx(TransactionType::CashOut, 10.0, (10.0, 0.0), (5.0, 15.0));
        assert_eq!(builder.build(&cash_out).type_code, 1.0);
    }

    #[test]
    fn test_imputation_triggers_on_suspicious_zero() {
        let builder = FeatureBuilder::new();
        let tx = tx(TransactionType::Transfer, 100.0, (500.0, 400.0), (0.0, 0.0));

        let features = builder.build(&tx);
        assert_eq!(features.receiver_balance_before_adj, -1.0);
        assert_eq!(features.receiver_balance_after_adj, -1.0);
        // -1 + 100 - (-1)
        assert_eq!(features.error_balance_receiver, 100.0);
    }

    #[test]
    fn test_imputation_guarded_by_zero_amount() {
        let builder = FeatureBuilder::new();
        let tx = tx(TransactionType::Transfer, 0.0, (500.0, 500.0), (0.0, 0.0));

        let features = builder.build(&tx);
        assert_eq!(features.receiver_balance_before_adj, 0.0);
        assert_eq!(features.receiver_balance_after_adj, 0.0);
        assert_eq!(features.error_balance_receiver, 0.0);
    }

    #[test]
    fn test_imputation_skipped_when_receiver_credited() {
        let builder = FeatureBuilder::new();
        let tx = tx(
            TransactionType::Transfer,
            100.0,
            (500.0, 400.0),
            (0.0, 100.0),
        );

        let features = builder.build(&tx);
        assert_eq!(features.receiver_balance_before_adj, 0.0);
        assert_eq!(features.receiver_balance_after_adj, 100.0);
        assert_eq!(features.error_balance_receiver, 0.0);
    }

    #[test]
    fn test_consistent_transfer_has_zero_sender_error() {
        let builder = FeatureBuilder::new();
        let tx = tx(
            TransactionType::Transfer,
            50_000.0,
            (100_000.0, 50_000.0),
            (0.0, 50_000.0),
        );

        // 50000 + 50000 - 100000
        assert_eq!(builder.build(&tx).error_balance_sender, 0.0);
    }

    #[test]
    fn test_consistent_transfer_full_vector() {
        let builder = FeatureBuilder::new();
        let tx = tx(
            TransactionType::Transfer,
            50_000.0,
            (100_000.0, 50_000.0),
            (0.0, 50_000.0),
        );

        // Receiver was actually credited, so no imputation.
        assert_eq!(
            builder.build(&tx).to_array(),
            [
                1.0, 0.0, 50_000.0, 100_000.0, 50_000.0, 0.0, 50_000.0, 0.0, 0.0
            ]
        );
    }

    #[test]
    fn test_fraud_pattern_full_vector() {
        let builder = FeatureBuilder::new();
        let tx = tx(
            TransactionType::Transfer,
            50_000.0,
            (100_000.0, 50_000.0),
            (0.0, 0.0),
        );

        // Money left the sender but the receiver never shows it: imputation
        // fires and the receiver error balloons to the full amount.
        assert_eq!(
            builder.build(&tx).to_array(),
            [
                1.0, 0.0, 50_000.0, 100_000.0, 50_000.0, -1.0, -1.0, 0.0, 50_000.0
            ]
        );
    }

    #[test]
    fn test_feature_names_match_count() {
        let builder = FeatureBuilder::new();
        assert_eq!(builder.feature_count(), 9);
        assert_eq!(FeatureVector::FEATURE_NAMES.len(), 9);
        assert_eq!(
            builder
                .build(&tx(
                    TransactionType::Transfer,
                    1.0,
                    (1.0, 0.0),
                    (0.0, 1.0)
                ))
                .to_array()
                .len(),
            FeatureVector::FEATURE_COUNT
        );
    }
}
