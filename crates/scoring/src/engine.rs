//! Scoring engine and its versioned lookup table

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trustlend_core::{Applicant, EmploymentCategory};

/// Version tag of the built-in lookup table
pub const TABLE_VERSION: &str = "v1";

/// Everyone starts from here
const BASE_SCORE: i32 = 50;

/// One named contribution to the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    /// Attribute the points came from (e.g. "age_bracket")
    pub factor: String,
    /// Signed contribution
    pub points: i32,
}

/// Deterministic score in [0,100] with its full component breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Clamped final score
    pub score: u8,
    /// Named contributions, in table order, base first
    pub components: Vec<ScoreComponent>,
    /// Lookup-table version that produced this result
    pub table_version: String,
}

/// The scoring engine. Stateless; `score` is a pure function.
#[derive(Debug, Default, Clone)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the credit score for an applicant.
    pub fn score(&self, applicant: &Applicant) -> ScoreResult {
        let mut components = vec![ScoreComponent {
            factor: "base".to_string(),
            points: BASE_SCORE,
        }];

        components.push(ScoreComponent {
            factor: "age_bracket".to_string(),
            points: age_points(applicant.age),
        });
        components.push(ScoreComponent {
            factor: "income_bracket".to_string(),
            points: income_points(applicant.monthly_income.value()),
        });
        components.push(ScoreComponent {
            factor: "employment".to_string(),
            points: employment_points(applicant.employment),
        });
        components.push(ScoreComponent {
            factor: "bank_account".to_string(),
            points: if applicant.has_bank_account { 5 } else { 0 },
        });

        let raw: i32 = components.iter().map(|c| c.points).sum();
        let score = raw.clamp(0, 100) as u8;

        ScoreResult {
            score,
            components,
            table_version: TABLE_VERSION.to_string(),
        }
    }
}

// Table v1: age brackets
fn age_points(age: u8) -> i32 {
    match age {
        18..=24 => 5,
        25..=45 => 15,
        46..=60 => 10,
        _ => 5,
    }
}

// Table v1: monthly income brackets
fn income_points(income: Decimal) -> i32 {
    if income >= Decimal::new(30_000, 0) {
        15
    } else if income >= Decimal::new(15_000, 0) {
        10
    } else if income >= Decimal::new(5_000, 0) {
        5
    } else {
        0
    }
}

// Table v1: employment category
fn employment_points(employment: EmploymentCategory) -> i32 {
    match employment {
        EmploymentCategory::Salaried => 10,
        EmploymentCategory::SelfEmployed => 5,
        EmploymentCategory::Unemployed => -10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trustlend_core::{Amount, ApplicantId};

    fn applicant(
        age: u8,
        income: Decimal,
        employment: EmploymentCategory,
        has_bank_account: bool,
    ) -> Applicant {
        Applicant {
            id: ApplicantId::new("APP-001"),
            age,
            monthly_income: Amount::new(income).unwrap(),
            employment,
            has_bank_account,
            region: "north".to_string(),
            gender: "female".to_string(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        // age 30 (+15), income 25000 (+10), salaried (+10), bank account (+5)
        let result = ScoringEngine::new().score(&applicant(
            30,
            dec!(25000),
            EmploymentCategory::Salaried,
            true,
        ));

        assert_eq!(result.score, 90);
        assert_eq!(result.table_version, TABLE_VERSION);
        assert_eq!(result.components[0].factor, "base");
        assert_eq!(result.components[0].points, 50);
    }

    #[test]
    fn test_worst_case_stays_in_bounds() {
        // 50 + 5 + 0 - 10 + 0 = 45; clamp is a no-op but bounds must hold
        let result = ScoringEngine::new().score(&applicant(
            18,
            dec!(0),
            EmploymentCategory::Unemployed,
            false,
        ));

        assert_eq!(result.score, 45);
        assert!(result.score <= 100);
    }

    #[test]
    fn test_best_case_stays_in_bounds() {
        // 50 + 15 + 15 + 10 + 5 = 95
        let result = ScoringEngine::new().score(&applicant(
            35,
            dec!(50000),
            EmploymentCategory::Salaried,
            true,
        ));

        assert_eq!(result.score, 95);
        assert!(result.score <= 100);
    }

    #[test]
    fn test_income_bracket_edges() {
        assert_eq!(income_points(dec!(4999)), 0);
        assert_eq!(income_points(dec!(5000)), 5);
        assert_eq!(income_points(dec!(14999)), 5);
        assert_eq!(income_points(dec!(15000)), 10);
        assert_eq!(income_points(dec!(29999)), 10);
        assert_eq!(income_points(dec!(30000)), 15);
    }

    #[test]
    fn test_age_bracket_edges() {
        assert_eq!(age_points(24), 5);
        assert_eq!(age_points(25), 15);
        assert_eq!(age_points(45), 15);
        assert_eq!(age_points(46), 10);
        assert_eq!(age_points(60), 10);
        assert_eq!(age_points(61), 5);
    }

    #[test]
    fn test_determinism() {
        let a = applicant(42, dec!(18000), EmploymentCategory::SelfEmployed, true);
        let engine = ScoringEngine::new();
        assert_eq!(engine.score(&a), engine.score(&a));
    }

    #[test]
    fn test_components_sum_to_score() {
        let result = ScoringEngine::new().score(&applicant(
            30,
            dec!(25000),
            EmploymentCategory::Salaried,
            true,
        ));
        let sum: i32 = result.components.iter().map(|c| c.points).sum();
        assert_eq!(sum.clamp(0, 100) as u8, result.score);
    }

    #[test]
    fn test_result_serde_roundtrip() {
        let result = ScoringEngine::new().score(&applicant(
            30,
            dec!(25000),
            EmploymentCategory::Salaried,
            true,
        ));
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ScoreResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
