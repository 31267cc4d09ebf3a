//! Feed of decision outcomes for the monitor
//!
//! The trait is the seam between fairness and whatever stores decisions;
//! the shipped implementation reads the audit ledger.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use trustlend_audit::DecisionLedger;

use crate::outcome::DecisionOutcome;

/// Errors from an outcome feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("outcome feed unavailable: {0}")]
    Unavailable(String),
}

/// Source of decision outcomes for one reporting window
#[async_trait]
pub trait DecisionFeed: Send + Sync {
    /// Outcomes created in `[from, to)`, any order
    async fn outcomes_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DecisionOutcome>, FeedError>;
}

/// Feed backed by the shared audit ledger
pub struct LedgerFeed {
    ledger: Arc<Mutex<DecisionLedger>>,
}

impl LedgerFeed {
    pub fn new(ledger: Arc<Mutex<DecisionLedger>>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl DecisionFeed for LedgerFeed {
    async fn outcomes_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DecisionOutcome>, FeedError> {
        let ledger = self
            .ledger
            .lock()
            .map_err(|e| FeedError::Unavailable(e.to_string()))?;

        Ok(ledger
            .records()
            .iter()
            .filter_map(|record| DecisionOutcome::from_event(&record.event))
            .filter(|outcome| outcome.created_at >= from && outcome.created_at < to)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use trustlend_audit::AuditEvent;
    use trustlend_core::{Amount, Applicant, ApplicantId, EmploymentCategory, ReasonCode};
    use trustlend_ensemble::{Decision, DecisionBranch, Verdict};

    fn applicant(region: &str) -> Applicant {
        Applicant {
            id: ApplicantId::new("APP-001"),
            age: 30,
            monthly_income: Amount::new(dec!(10000)).unwrap(),
            employment: EmploymentCategory::Salaried,
            has_bank_account: true,
            region: region.to_string(),
            gender: "female".to_string(),
        }
    }

    fn decision(id: &str, verdict: Verdict, created_at: DateTime<Utc>) -> Decision {
        Decision {
            id: id.to_string(),
            applicant_id: ApplicantId::new("APP-001"),
            verdict,
            branch: DecisionBranch::AllClear,
            reasons: vec![ReasonCode::AllChecksPassed],
            score: None,
            trust: None,
            anomaly: None,
            rule_report: None,
            policy_version: "policy-v1".to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_ledger_feed_filters_window_and_event_kind() {
        let now = Utc::now();
        let mut ledger = DecisionLedger::in_memory();
        ledger
            .append(AuditEvent::policy_activated("policy-v1", "abc"))
            .unwrap();
        ledger
            .append(AuditEvent::decision_recorded(
                decision("d-in", Verdict::Approved, now - Duration::hours(1)),
                &applicant("north"),
            ))
            .unwrap();
        ledger
            .append(AuditEvent::decision_recorded(
                decision("d-old", Verdict::Rejected, now - Duration::days(60)),
                &applicant("south"),
            ))
            .unwrap();

        let feed = LedgerFeed::new(Arc::new(Mutex::new(ledger)));
        let outcomes = feed
            .outcomes_between(now - Duration::days(30), now)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].decision_id, "d-in");
        assert!(outcomes[0].approved);
        assert_eq!(outcomes[0].region, "north");
    }
}
