//! LoanRequest and account facts supplied by the intake layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, ApplicantId};

/// A single loan application. Created once per application and never
/// mutated after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Applicant this request belongs to
    pub applicant_id: ApplicantId,
    /// Requested amount (non-negative; zero is rejected by validation)
    pub amount: Amount,
    /// Stated purpose of the loan
    pub purpose: String,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
}

/// Minimal account facts the rule engine needs. Fetched once by the caller;
/// the rule engine itself performs no I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFacts {
    /// Age of the applicant's account in days
    pub account_age_days: i64,
    /// Prior applications inside the burst window, excluding this one
    pub applications_in_window: u32,
}

impl AccountFacts {
    pub fn new(account_age_days: i64, applications_in_window: u32) -> Self {
        Self {
            account_age_days,
            applications_in_window,
        }
    }
}
