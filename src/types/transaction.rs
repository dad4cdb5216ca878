//! Raw transaction input for fraud scoring

use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest hour index in the PaySim simulation window.
pub const TIME_STEP_MIN: u32 = 1;
/// Highest hour index in the PaySim simulation window (31 days of hours).
pub const TIME_STEP_MAX: u32 = 744;

/// Transaction category the classifier was trained on.
///
/// The training set keeps only TRANSFER and CASH_OUT rows (the categories
/// where fraud occurs in PaySim). Anything else is rejected at the input
/// boundary rather than silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    CashOut,
}

impl TransactionType {
    /// Numeric encoding used during training: TRANSFER = 0, CASH_OUT = 1.
    pub fn code(&self) -> f64 {
        match self {
            TransactionType::Transfer => 0.0,
            TransactionType::CashOut => 1.0,
        }
    }

    /// Canonical dataset spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "TRANSFER",
            TransactionType::CashOut => "CASH_OUT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRANSFER" => Ok(TransactionType::Transfer),
            "CASH_OUT" => Ok(TransactionType::CashOut),
            other => Err(ScoringError::validation(
                "transaction_type",
                format!("unrecognized type {other:?}, expected TRANSFER or CASH_OUT"),
            )),
        }
    }
}

/// A single transaction submitted for analysis.
///
/// Serde aliases match the column names of the training data, so a
/// transaction can be deserialized straight from a training-style record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Hour index in the simulation window, 1..=744
    #[serde(alias = "step")]
    pub time_step: u32,

    /// Transaction category
    #[serde(alias = "type")]
    pub tx_type: TransactionType,

    /// Transacted amount
    pub amount: f64,

    /// Sender balance before the transaction
    #[serde(alias = "oldBalanceOrig")]
    pub sender_balance_before: f64,

    /// Sender balance after the transaction
    #[serde(alias = "newBalanceOrig")]
    pub sender_balance_after: f64,

    /// Receiver balance before the transaction
    #[serde(alias = "oldBalanceDest")]
    pub receiver_balance_before: f64,

    /// Receiver balance after the transaction
    #[serde(alias = "newBalanceDest")]
    pub receiver_balance_after: f64,
}

impl RawTransaction {
    /// Create a transaction from already-validated field values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time_step: u32,
        tx_type: TransactionType,
        amount: f64,
        sender_balance_before: f64,
        sender_balance_after: f64,
        receiver_balance_before: f64,
        receiver_balance_after: f64,
    ) -> Self {
        Self {
            time_step,
            tx_type,
            amount,
            sender_balance_before,
            sender_balance_after,
            receiver_balance_before,
            receiver_balance_after,
        }
    }

    /// Check every field against its documented range.
    ///
    /// The feature builder assumes validated input; callers that construct
    /// transactions from anywhere other than the interactive form (which
    /// validates per field) must call this first.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(TIME_STEP_MIN..=TIME_STEP_MAX).contains(&self.time_step) {
            return Err(ScoringError::validation(
                "time_step",
                format!(
                    "must be between {TIME_STEP_MIN} and {TIME_STEP_MAX} (got {})",
                    self.time_step
                ),
            ));
        }

        check_non_negative("amount", self.amount)?;
        check_non_negative("sender_balance_before", self.sender_balance_before)?;
        check_non_negative("sender_balance_after", self.sender_balance_after)?;
        check_non_negative("receiver_balance_before", self.receiver_balance_before)?;
        check_non_negative("receiver_balance_after", self.receiver_balance_after)?;

        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::validation(
            field,
            format!("must be a finite number (got {value})"),
        ));
    }
    if value < 0.0 {
        return Err(ScoringError::validation(
            field,
            format!("must be non-negative (got {value})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawTransaction {
        RawTransaction::new(
            1,
            TransactionType::Transfer,
            50_000.0,
            100_000.0,
            50_000.0,
            0.0,
            50_000.0,
        )
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!(
            "TRANSFER".parse::<TransactionType>().unwrap(),
            TransactionType::Transfer
        );
        assert_eq!(
            "cash_out".parse::<TransactionType>().unwrap(),
            TransactionType::CashOut
        );
        assert_eq!(
            "  transfer ".parse::<TransactionType>().unwrap(),
            TransactionType::Transfer
        );
    }

    #[test]
    fn test_unrecognized_type_rejected() {
        let err = "PAYMENT".parse::<TransactionType>().unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Validation {
                field: "transaction_type",
                ..
            }
        ));
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(TransactionType::Transfer.code(), 0.0);
        assert_eq!(TransactionType::CashOut.code(), 1.0);
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_time_step_bounds() {
        let mut tx = sample();
        tx.time_step = 0;
        assert!(tx.validate().is_err());

        tx.time_step = 745;
        assert!(tx.validate().is_err());

        tx.time_step = 744;
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut tx = sample();
        tx.amount = -1.0;
        let err = tx.validate().unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Validation { field: "amount", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_balance() {
        let mut tx = sample();
        tx.receiver_balance_after = f64::NAN;
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_deserialize_training_column_names() {
        let json = r#"{
            "step": 42,
            "type": "CASH_OUT",
            "amount": 1250.5,
            "oldBalanceOrig": 2000.0,
            "newBalanceOrig": 749.5,
            "oldBalanceDest": 0.0,
            "newBalanceDest": 0.0
        }"#;

        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.time_step, 42);
        assert_eq!(tx.tx_type, TransactionType::CashOut);
        assert_eq!(tx.amount, 1250.5);
        assert_eq!(tx.sender_balance_after, 749.5);
    }

    #[test]
    fn test_transaction_serialization() {
        let tx = sample();

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: RawTransaction = serde_json::from_str(&json).unwrap();

        assert_eq!(tx, deserialized);
        assert!(json.contains("\"TRANSFER\""));
    }
}
