//! Policy errors

use thiserror::Error;

/// Errors from loading or validating a decision policy.
///
/// All of these are fatal: a pipeline is never constructed over a policy
/// that failed validation.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Failed to read policy file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse policy: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid policy parameter {parameter}: {detail}")]
    InvalidParameter {
        parameter: &'static str,
        detail: String,
    },
}

impl PolicyError {
    pub fn invalid(parameter: &'static str, detail: impl Into<String>) -> Self {
        PolicyError::InvalidParameter {
            parameter,
            detail: detail.into(),
        }
    }
}

/// Result type for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;
