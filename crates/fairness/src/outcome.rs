//! The minimal decision projection fairness aggregates over

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trustlend_audit::AuditEvent;
use trustlend_core::AgeGroup;

/// One decision outcome with its protected attributes.
///
/// `approved` is true only for an Approved verdict; rejections and manual
/// reviews both count as adverse for disparate-impact purposes, since a
/// review is a burden the applicant carries either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision_id: String,
    pub approved: bool,
    pub gender: String,
    pub region: String,
    pub age_group: AgeGroup,
    pub created_at: DateTime<Utc>,
}

impl DecisionOutcome {
    /// Project an audit event onto an outcome row. Non-decision events
    /// yield `None`.
    pub fn from_event(event: &AuditEvent) -> Option<Self> {
        match event {
            AuditEvent::DecisionRecorded {
                decision,
                gender,
                region,
                age_group,
            } => Some(Self {
                decision_id: decision.id.clone(),
                approved: decision.is_approved(),
                gender: gender.clone(),
                region: region.clone(),
                age_group: *age_group,
                created_at: decision.created_at,
            }),
            _ => None,
        }
    }
}
