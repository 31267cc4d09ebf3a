//! The orchestrator

use std::sync::{Arc, Mutex};

use tracing::{error, info};

use trustlend_anomaly::AnomalyDetector;
use trustlend_audit::{AuditEvent, DecisionLedger};
use trustlend_core::{validate_applicant, validate_request, AccountFacts, Applicant, LoanRequest};
use trustlend_ensemble::{Decision, EnsembleAggregator};
use trustlend_explain::{ExplanationGenerator, Explanations};
use trustlend_policy::DecisionPolicy;
use trustlend_rules::RuleEngine;
use trustlend_scoring::ScoringEngine;
use trustlend_trust::TrustGraphAnalyzer;

use crate::error::{PipelineError, PipelineResult};
use crate::source::{HistoricalSource, PeerSnapshotSource, SourceError};

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct DecisionRun {
    pub decision: Decision,
    pub explanations: Explanations,
}

/// The full decision pipeline over a validated policy.
///
/// Engines share nothing and keep no per-run state, so one pipeline value
/// serves concurrent runs; the audit ledger is the single serialization
/// point.
pub struct DecisionPipeline {
    rules: RuleEngine,
    scoring: ScoringEngine,
    anomaly: AnomalyDetector,
    trust: TrustGraphAnalyzer,
    ensemble: EnsembleAggregator,
    explainer: ExplanationGenerator,
    history: Arc<dyn HistoricalSource>,
    peers: Arc<dyn PeerSnapshotSource>,
    ledger: Option<Arc<Mutex<DecisionLedger>>>,
}

impl DecisionPipeline {
    /// Build a pipeline. An invalid policy is fatal here; no engine runs
    /// over unvalidated bounds.
    pub fn new(
        policy: DecisionPolicy,
        history: Arc<dyn HistoricalSource>,
        peers: Arc<dyn PeerSnapshotSource>,
    ) -> PipelineResult<Self> {
        policy.validate()?;
        Ok(Self {
            rules: RuleEngine::new(policy.clone()),
            scoring: ScoringEngine::new(),
            anomaly: AnomalyDetector::new(policy.clone()),
            trust: TrustGraphAnalyzer::new(policy.clone()),
            ensemble: EnsembleAggregator::new(policy.clone()),
            explainer: ExplanationGenerator::new(policy),
            history,
            peers,
            ledger: None,
        })
    }

    /// Record every decision on the given ledger
    pub fn with_ledger(mut self, ledger: Arc<Mutex<DecisionLedger>>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Run one request through the full pipeline.
    ///
    /// Malformed inputs and audit failures are errors; a failing upstream
    /// source instead yields a fail-closed manual-review Decision, which is
    /// still recorded.
    pub fn decide(
        &self,
        applicant: &Applicant,
        request: &LoanRequest,
        facts: &AccountFacts,
    ) -> PipelineResult<DecisionRun> {
        validate_applicant(applicant)?;
        validate_request(request, applicant)?;

        let rule_report = self.rules.evaluate(applicant, request, facts);

        let decision = if rule_report.rejected.is_some() {
            // Short circuit: no layer runs after a hard rule reject
            self.ensemble
                .decide(applicant.id.clone(), rule_report, None, None, None)
        } else {
            match self.fetch(applicant) {
                Ok((baseline, snapshot)) => {
                    let score = self.scoring.score(applicant);
                    let anomaly = self.anomaly.detect(
                        request,
                        &applicant.region,
                        snapshot.peer_count(),
                        baseline.as_ref(),
                    );
                    let trust = self.trust.analyze(&snapshot, request.submitted_at);

                    self.ensemble.decide(
                        applicant.id.clone(),
                        rule_report,
                        Some(score),
                        Some(trust),
                        Some(anomaly),
                    )
                }
                Err(e) => {
                    error!(applicant = %applicant.id, error = %e, "upstream source failed; failing closed");
                    self.ensemble
                        .decide(applicant.id.clone(), rule_report, None, None, None)
                }
            }
        };

        let explanations = self.explainer.render(&decision);

        if let Some(ledger) = &self.ledger {
            let mut ledger = ledger
                .lock()
                .map_err(|e| PipelineError::LedgerUnavailable(e.to_string()))?;
            ledger.append(AuditEvent::decision_recorded(decision.clone(), applicant))?;
        }

        info!(
            applicant = %applicant.id,
            decision = %decision.id,
            verdict = %decision.verdict,
            branch = %decision.branch,
            "decision issued"
        );

        Ok(DecisionRun {
            decision,
            explanations,
        })
    }

    fn fetch(
        &self,
        applicant: &Applicant,
    ) -> Result<
        (
            Option<trustlend_anomaly::HistoricalBaseline>,
            trustlend_trust::PeerGraphSnapshot,
        ),
        SourceError,
    > {
        let baseline = self.history.baseline(&applicant.id)?;
        let snapshot = self.peers.snapshot(&applicant.id)?;
        Ok((baseline, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{InMemoryHistory, InMemoryPeers};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use trustlend_core::{Amount, ApplicantId, EmploymentCategory};
    use trustlend_ensemble::Verdict;

    fn applicant() -> Applicant {
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

    fn request() -> LoanRequest {
        LoanRequest {
            applicant_id: ApplicantId::new("APP-001"),
            amount: Amount::new(dec!(5000)).unwrap(),
            purpose: "inventory".to_string(),
            submitted_at: Utc::now(),
        }
    }

    fn pipeline() -> DecisionPipeline {
        DecisionPipeline::new(
            DecisionPolicy::default(),
            Arc::new(InMemoryHistory::new()),
            Arc::new(InMemoryPeers::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_policy_refused_at_construction() {
        let policy = DecisionPolicy {
            trust_threshold: 2.0,
            ..Default::default()
        };
        let result = DecisionPipeline::new(
            policy,
            Arc::new(InMemoryHistory::new()),
            Arc::new(InMemoryPeers::new()),
        );
        assert!(matches!(result, Err(PipelineError::Policy(_))));
    }

    #[test]
    fn test_malformed_input_is_an_error_not_a_decision() {
        let mut bad = applicant();
        bad.age = 17;

        let result = pipeline().decide(&bad, &request(), &AccountFacts {
            account_age_days: 400,
            applications_in_window: 0,
        });
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_rule_reject_skips_all_layers() {
        let facts = AccountFacts {
            account_age_days: 5, // below the 30-day minimum
            applications_in_window: 0,
        };

        let run = pipeline().decide(&applicant(), &request(), &facts).unwrap();
        assert_eq!(run.decision.verdict, Verdict::Rejected);
        assert!(run.decision.score.is_none());
        assert!(run.decision.trust.is_none());
        assert!(run.decision.anomaly.is_none());
    }
}
