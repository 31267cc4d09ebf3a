//! Audit ledger errors

use thiserror::Error;

/// Errors from the decision ledger
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Broken chain at sequence {sequence}: expected prev_hash {expected}, found {actual}")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at sequence {sequence}")]
    InvalidHash { sequence: u64 },

    #[error("Invalid sequence: expected {expected}, found {actual}")]
    InvalidSequence { expected: u64, actual: u64 },
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;
