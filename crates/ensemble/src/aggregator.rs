//! Ensemble aggregator - the five priority branches

use chrono::Utc;
use uuid::Uuid;

use trustlend_anomaly::AnomalyResult;
use trustlend_core::{ApplicantId, ReasonCode};
use trustlend_policy::DecisionPolicy;
use trustlend_rules::RuleReport;
use trustlend_scoring::ScoreResult;
use trustlend_trust::TrustResult;

use crate::decision::{Decision, DecisionBranch, Verdict};

/// Merges rule, score, trust, and anomaly outputs into one Decision.
///
/// Evaluation is strictly ordered; the first branch that applies wins:
/// 1. rule REJECT
/// 2. fraud-ring override
/// 3. all thresholds cleared -> APPROVED
/// 4. score or trust below its floor -> REJECTED
/// 5. MANUAL_REVIEW
pub struct EnsembleAggregator {
    policy: DecisionPolicy,
}

impl EnsembleAggregator {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Produce the Decision for one pipeline run.
    ///
    /// Layer results are optional because a rule reject short-circuits
    /// before they run. A missing layer without a rule reject means an
    /// upstream gap; the aggregator fails closed to manual review rather
    /// than guess.
    pub fn decide(
        &self,
        applicant_id: ApplicantId,
        rule_report: RuleReport,
        score: Option<ScoreResult>,
        trust: Option<TrustResult>,
        anomaly: Option<AnomalyResult>,
    ) -> Decision {
        let flags = rule_report.flags.clone();

        // Branch 1: hard rule reject
        if let Some(rule_reason) = rule_report.rejected {
            let mut reasons = vec![rule_reason];
            reasons.extend(flags);
            return self.build(
                applicant_id,
                Verdict::Rejected,
                DecisionBranch::HardRuleReject,
                reasons,
                score,
                trust,
                anomaly,
                rule_report,
            );
        }

        let (Some(score), Some(trust), Some(anomaly)) = (score, trust, anomaly) else {
            // A layer is missing without a rule reject: fail closed.
            let mut reasons = vec![ReasonCode::InsufficientInformation];
            reasons.extend(flags);
            return self.build(
                applicant_id,
                Verdict::ManualReview,
                DecisionBranch::FailClosed,
                reasons,
                None,
                None,
                None,
                rule_report,
            );
        };

        // Branch 2: critical override
        if trust.fraud_ring_detected {
            let mut reasons = vec![ReasonCode::FraudRingDetected];
            reasons.extend(flags);
            return self.build(
                applicant_id,
                Verdict::Rejected,
                DecisionBranch::FraudRingOverride,
                reasons,
                Some(score),
                Some(trust),
                Some(anomaly),
                rule_report,
            );
        }

        // Branch 3: approval
        if score.score >= self.policy.score_threshold
            && trust.trust_score >= self.policy.trust_threshold
            && anomaly.anomaly_score < self.policy.anomaly_threshold
        {
            let mut reasons = vec![ReasonCode::AllChecksPassed];
            reasons.extend(flags);
            return self.build(
                applicant_id,
                Verdict::Approved,
                DecisionBranch::AllClear,
                reasons,
                Some(score),
                Some(trust),
                Some(anomaly),
                rule_report,
            );
        }

        // Branch 4: floor reject
        if score.score < self.policy.reject_score_floor
            || trust.trust_score < self.policy.reject_trust_floor
        {
            let mut reasons = Vec::new();
            if score.score < self.policy.reject_score_floor {
                reasons.push(ReasonCode::ScoreBelowFloor);
            }
            if trust.trust_score < self.policy.reject_trust_floor {
                reasons.push(ReasonCode::TrustBelowFloor);
            }
            reasons.extend(flags);
            return self.build(
                applicant_id,
                Verdict::Rejected,
                DecisionBranch::FloorReject,
                reasons,
                Some(score),
                Some(trust),
                Some(anomaly),
                rule_report,
            );
        }

        // Branch 5: manual review, with the specific shortfalls recorded
        let mut reasons = Vec::new();
        if score.score < self.policy.score_threshold {
            reasons.push(ReasonCode::ScoreBelowThreshold);
        }
        if trust.trust_score < self.policy.trust_threshold {
            reasons.push(ReasonCode::TrustBelowThreshold);
        }
        if anomaly.anomaly_score >= self.policy.anomaly_threshold {
            reasons.push(ReasonCode::AnomalyAboveThreshold);
        }
        reasons.extend(flags);
        self.build(
            applicant_id,
            Verdict::ManualReview,
            DecisionBranch::ManualReview,
            reasons,
            Some(score),
            Some(trust),
            Some(anomaly),
            rule_report,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        applicant_id: ApplicantId,
        verdict: Verdict,
        branch: DecisionBranch,
        reasons: Vec<ReasonCode>,
        score: Option<ScoreResult>,
        trust: Option<TrustResult>,
        anomaly: Option<AnomalyResult>,
        rule_report: RuleReport,
    ) -> Decision {
        let decision = Decision {
            id: Uuid::new_v4().to_string(),
            applicant_id,
            verdict,
            branch,
            reasons,
            score,
            trust,
            anomaly,
            rule_report: Some(rule_report),
            policy_version: self.policy.version.clone(),
            created_at: Utc::now(),
        };

        tracing::info!(
            decision_id = %decision.id,
            applicant = %decision.applicant_id,
            verdict = %decision.verdict,
            branch = %decision.branch,
            "decision made"
        );

        decision
    }
}
