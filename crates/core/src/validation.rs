//! Input validation - performed before anything enters the pipeline
//!
//! A malformed Applicant or LoanRequest never reaches scoring. The Amount
//! type already excludes negative values at construction; the checks here
//! cover the remaining structural constraints.

use thiserror::Error;

use crate::{Applicant, LoanRequest};

/// Minimum age to apply
const MIN_APPLICANT_AGE: u8 = 18;
/// Sanity ceiling for age
const MAX_APPLICANT_AGE: u8 = 120;

/// Errors for malformed pipeline inputs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Applicant id must not be empty")]
    EmptyApplicantId,

    #[error("Applicant age {0} is outside the accepted range {MIN_APPLICANT_AGE}..={MAX_APPLICANT_AGE}")]
    AgeOutOfRange(u8),

    #[error("Applicant region must not be empty")]
    EmptyRegion,

    #[error("Applicant gender must not be empty")]
    EmptyGender,

    #[error("Requested amount must be positive")]
    NonPositiveAmount,

    #[error("Loan purpose must not be empty")]
    EmptyPurpose,

    #[error("Request applicant id {request} does not match applicant {applicant}")]
    ApplicantMismatch { request: String, applicant: String },
}

/// Validate an applicant supplied by the intake layer
pub fn validate_applicant(applicant: &Applicant) -> Result<(), ValidationError> {
    if applicant.id.is_empty() {
        return Err(ValidationError::EmptyApplicantId);
    }
    if applicant.age < MIN_APPLICANT_AGE || applicant.age > MAX_APPLICANT_AGE {
        return Err(ValidationError::AgeOutOfRange(applicant.age));
    }
    if applicant.region.trim().is_empty() {
        return Err(ValidationError::EmptyRegion);
    }
    if applicant.gender.trim().is_empty() {
        return Err(ValidationError::EmptyGender);
    }
    Ok(())
}

/// Validate a loan request against its applicant
pub fn validate_request(
    request: &LoanRequest,
    applicant: &Applicant,
) -> Result<(), ValidationError> {
    if request.amount.is_zero() {
        return Err(ValidationError::NonPositiveAmount);
    }
    if request.purpose.trim().is_empty() {
        return Err(ValidationError::EmptyPurpose);
    }
    if request.applicant_id != applicant.id {
        return Err(ValidationError::ApplicantMismatch {
            request: request.applicant_id.to_string(),
            applicant: applicant.id.to_string(),
        });
    }
    Ok(())
}
