//! Pipeline errors
//!
//! Only caller bugs and audit failures surface as errors; upstream source
//! failures are absorbed into a fail-closed Decision instead.

use thiserror::Error;

use trustlend_audit::AuditError;
use trustlend_core::ValidationError;
use trustlend_policy::PolicyError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Audit ledger unavailable: {0}")]
    LedgerUnavailable(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
