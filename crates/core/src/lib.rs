//! TrustLend Core - Domain types
//!
//! This crate contains the fundamental types used across TrustLend:
//! - `Amount`: Non-negative decimal wrapper for monetary values
//! - `Applicant` / `LoanRequest`: immutable inputs to one decision run
//! - `ReasonCode`: wire-stable codes shared by rules, ensemble, explanations
//! - Input validation (`ValidationError`) performed before the pipeline

pub mod amount;
pub mod applicant;
pub mod reason;
pub mod request;
pub mod validation;

pub use amount::Amount;
pub use applicant::{AgeGroup, Applicant, ApplicantId, EmploymentCategory};
pub use reason::ReasonCode;
pub use request::{AccountFacts, LoanRequest};
pub use validation::{validate_applicant, validate_request, ValidationError};
