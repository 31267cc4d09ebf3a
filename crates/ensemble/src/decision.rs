//! The Decision artifact - terminal, immutable output of one pipeline run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use trustlend_anomaly::AnomalyResult;
use trustlend_core::{ApplicantId, ReasonCode};
use trustlend_rules::RuleReport;
use trustlend_scoring::ScoreResult;
use trustlend_trust::TrustResult;

/// Final verdict of a pipeline run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Approved,
    Rejected,
    ManualReview,
}

/// Which priority branch produced the verdict
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionBranch {
    /// A hard rule rejected before any layer ran
    HardRuleReject,
    /// Fraud ring override, regardless of score and trust
    FraudRingOverride,
    /// Score, trust, and anomaly all cleared their thresholds
    AllClear,
    /// Score or trust fell below a reject floor
    FloorReject,
    /// No branch was conclusive
    ManualReview,
    /// An upstream source failed; the pipeline failed closed
    FailClosed,
}

/// The terminal, immutable artifact of one pipeline run.
///
/// Created once, read many times (explanation, audit, fairness). Any later
/// correction is a new superseding record in the audit ledger, never a
/// mutation of this value. Results of layers that never ran (rule-reject
/// short circuit, upstream failure) are `None` - the decision records
/// exactly what was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique decision id
    pub id: String,
    /// Applicant the decision is about
    pub applicant_id: ApplicantId,
    /// Final verdict
    pub verdict: Verdict,
    /// Branch that fired
    pub branch: DecisionBranch,
    /// Reason codes, most significant first
    pub reasons: Vec<ReasonCode>,
    /// Scoring output, if that layer ran
    pub score: Option<ScoreResult>,
    /// Trust output, if that layer ran
    pub trust: Option<TrustResult>,
    /// Anomaly output, if that layer ran
    pub anomaly: Option<AnomalyResult>,
    /// Full rule evaluation trail
    pub rule_report: Option<RuleReport>,
    /// Policy version in effect at creation
    pub policy_version: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.verdict == Verdict::Rejected
    }

    pub fn needs_review(&self) -> bool {
        self.verdict == Verdict::ManualReview
    }
}
