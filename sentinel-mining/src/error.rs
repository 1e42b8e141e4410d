//! Mining error types.
//!
//! Every failure mode has a named variant. Empty input is not a failure:
//! zero transactions or zero frequent itemsets produce empty results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("Invalid parameter {param}: {reason}")]
    InvalidParameter { param: &'static str, reason: String },

    #[error("Transaction set has {0} items, at most 64 are supported")]
    TooManyItems(usize),

    #[error("Transaction row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Support for sub-itemset {0:?} is missing from the frequent itemsets")]
    MissingSupport(Vec<String>),
}

/// Result type alias for mining operations.
pub type MiningResult<T> = Result<T, MiningError>;
