//! Type definitions for the fraud scoring console

pub mod transaction;
pub mod verdict;

pub use transaction::{RawTransaction, TransactionType, TIME_STEP_MAX, TIME_STEP_MIN};
pub use verdict::{AnalysisReport, Recommendation};
