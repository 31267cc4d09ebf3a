//! Audit event types
//!
//! `DecisionRecorded` carries the full Decision plus the protected
//! attributes fairness reporting needs, so a record can be replayed
//! without joining against any other store. Overrides and policy
//! activations reference decisions by id; they never rewrite them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trustlend_core::{AgeGroup, Applicant};
use trustlend_ensemble::{Decision, Verdict};

/// One auditable event in the life of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A completed automated decision, self-contained
    DecisionRecorded {
        decision: Decision,
        gender: String,
        region: String,
        age_group: AgeGroup,
    },
    /// A human override of an earlier decision
    OfficerOverride {
        decision_id: String,
        verdict: Verdict,
        officer_id: String,
        justification: String,
        recorded_at: DateTime<Utc>,
    },
    /// A policy version going live
    PolicyActivated {
        version: String,
        policy_hash: String,
        activated_at: DateTime<Utc>,
    },
}

impl AuditEvent {
    pub fn decision_recorded(decision: Decision, applicant: &Applicant) -> Self {
        let age_group = applicant.age_group();
        Self::DecisionRecorded {
            decision,
            gender: applicant.gender.clone(),
            region: applicant.region.clone(),
            age_group,
        }
    }

    pub fn officer_override(
        decision_id: impl Into<String>,
        verdict: Verdict,
        officer_id: impl Into<String>,
        justification: impl Into<String>,
    ) -> Self {
        Self::OfficerOverride {
            decision_id: decision_id.into(),
            verdict,
            officer_id: officer_id.into(),
            justification: justification.into(),
            recorded_at: Utc::now(),
        }
    }

    pub fn policy_activated(version: impl Into<String>, policy_hash: impl Into<String>) -> Self {
        Self::PolicyActivated {
            version: version.into(),
            policy_hash: policy_hash.into(),
            activated_at: Utc::now(),
        }
    }

    /// Timestamp of the underlying event
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::DecisionRecorded { decision, .. } => decision.created_at,
            Self::OfficerOverride { recorded_at, .. } => *recorded_at,
            Self::PolicyActivated { activated_at, .. } => *activated_at,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::DecisionRecorded { .. } => "decision_recorded",
            Self::OfficerOverride { .. } => "officer_override",
            Self::PolicyActivated { .. } => "policy_activated",
        }
    }
}
