//! Applicant - identity and attributes supplied by the caller
//!
//! An Applicant is immutable for the duration of one decision run. Protected
//! attributes (gender, region, age group) travel with it because the fairness
//! monitor aggregates over them later; the scoring table itself never reads
//! gender or region.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

use crate::Amount;

/// Opaque applicant identity handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(String);

impl ApplicantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ApplicantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Employment category of an applicant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentCategory {
    Salaried,
    SelfEmployed,
    Unemployed,
}

/// Age group - protected attribute derived from age
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeGroup {
    Under25,
    From25To45,
    From46To60,
    Over60,
}

impl AgeGroup {
    /// Derive the group from a raw age in years
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=24 => AgeGroup::Under25,
            25..=45 => AgeGroup::From25To45,
            46..=60 => AgeGroup::From46To60,
            _ => AgeGroup::Over60,
        }
    }
}

/// A loan applicant with no conventional credit history.
///
/// Immutable per decision; the caller supplies a fresh value per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    /// Identity handle
    pub id: ApplicantId,
    /// Age in years
    pub age: u8,
    /// Monthly income (non-negative)
    pub monthly_income: Amount,
    /// Employment category
    pub employment: EmploymentCategory,
    /// Whether the applicant holds a bank account
    pub has_bank_account: bool,
    /// Region of residence (protected attribute)
    pub region: String,
    /// Gender (protected attribute, free-form as supplied by intake)
    pub gender: String,
}

impl Applicant {
    /// Derived age-group protected attribute
    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::from_age(self.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Applicant {
        Applicant {
            id: ApplicantId::new("APP-001"),
            age: 30,
            monthly_income: Amount::new(dec!(25000)).unwrap(),
            employment: EmploymentCategory::Salaried,
            has_bank_account: true,
            region: "north".to_string(),
            gender: "female".to_string(),
        }
    }

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(18), AgeGroup::Under25);
        assert_eq!(AgeGroup::from_age(24), AgeGroup::Under25);
        assert_eq!(AgeGroup::from_age(25), AgeGroup::From25To45);
        assert_eq!(AgeGroup::from_age(45), AgeGroup::From25To45);
        assert_eq!(AgeGroup::from_age(46), AgeGroup::From46To60);
        assert_eq!(AgeGroup::from_age(60), AgeGroup::From46To60);
        assert_eq!(AgeGroup::from_age(61), AgeGroup::Over60);
    }

    #[test]
    fn test_applicant_age_group() {
        assert_eq!(sample().age_group(), AgeGroup::From25To45);
    }

    #[test]
    fn test_employment_codes() {
        assert_eq!(EmploymentCategory::SelfEmployed.to_string(), "SELF_EMPLOYED");
        assert_eq!(
            serde_json::to_string(&EmploymentCategory::Salaried).unwrap(),
            "\"salaried\""
        );
    }

    #[test]
    fn test_applicant_serde_roundtrip() {
        let applicant = sample();
        let json = serde_json::to_string(&applicant).unwrap();
        let parsed: Applicant = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, applicant);
    }
}
