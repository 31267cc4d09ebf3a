//! Rule outcomes and the per-run evaluation report

use serde::{Deserialize, Serialize};

use trustlend_core::ReasonCode;

/// Result of one rule predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// Rule is satisfied, continue
    Pass,
    /// Hard reject - pipeline short-circuits
    Reject { reason: ReasonCode },
    /// Carry a review flag forward without short-circuiting
    Flag { reason: ReasonCode },
}

impl RuleOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleOutcome::Pass)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, RuleOutcome::Reject { .. })
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, RuleOutcome::Flag { .. })
    }
}

/// One evaluated rule with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    /// Stable rule name
    pub rule: String,
    /// What the rule decided
    pub outcome: RuleOutcome,
}

/// Complete trail of one rule-engine run.
///
/// Rules after the first reject are not evaluated (short-circuit), so
/// `evaluations` lists exactly the predicates that ran, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReport {
    /// Every rule that ran, in evaluation order
    pub evaluations: Vec<RuleEvaluation>,
    /// Reason of the first reject, if any
    pub rejected: Option<ReasonCode>,
    /// Flags collected before the short-circuit point
    pub flags: Vec<ReasonCode>,
}

impl RuleReport {
    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }
}
