//! Disparate-impact aggregation
//!
//! Per protected attribute, the monitor groups outcomes, takes the group
//! with the highest approval rate as the reference, and computes each
//! other group's approval-rate ratio against it. A ratio below the policy
//! floor (four-fifths rule by default) raises an alert. Groups smaller
//! than `min_group_sample` are reported but never alerted on; small-sample
//! ratios are noise, not evidence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::info;

use trustlend_policy::DecisionPolicy;

use crate::outcome::DecisionOutcome;

/// Protected attributes the monitor aggregates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtectedAttribute {
    Gender,
    Region,
    AgeGroup,
}

const ATTRIBUTES: [ProtectedAttribute; 3] = [
    ProtectedAttribute::Gender,
    ProtectedAttribute::Region,
    ProtectedAttribute::AgeGroup,
];

/// Approval counts for one group within one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group: String,
    pub total: usize,
    pub approved: usize,
    pub approval_rate: f64,
}

/// One group's ratio against the reference group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisparateImpact {
    pub group: String,
    pub ratio: f64,
    pub passes: bool,
}

/// An alerted disparate-impact violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessAlert {
    pub attribute: ProtectedAttribute,
    pub group: String,
    pub ratio: f64,
    pub floor: f64,
}

/// Report for one protected attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    pub attribute: ProtectedAttribute,
    pub groups: Vec<GroupStats>,
    /// Group with the highest approval rate among those meeting the
    /// sample floor; `None` when no group qualifies
    pub reference_group: Option<String>,
    pub impacts: Vec<DisparateImpact>,
}

/// One complete fairness report over a reporting window.
///
/// Built in full before publication; consumers never observe a partially
/// updated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessSnapshot {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub sample_size: usize,
    pub reports: Vec<AttributeReport>,
    pub alerts: Vec<FairnessAlert>,
    pub policy_version: String,
}

impl FairnessSnapshot {
    pub fn passed(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Pure aggregator from outcomes to a snapshot
pub struct FairnessMonitor {
    policy: DecisionPolicy,
}

impl FairnessMonitor {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Aggregate one window of outcomes into a snapshot
    pub fn evaluate(
        &self,
        outcomes: &[DecisionOutcome],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> FairnessSnapshot {
        let mut reports = Vec::with_capacity(ATTRIBUTES.len());
        let mut alerts = Vec::new();

        for attribute in ATTRIBUTES {
            let report = self.evaluate_attribute(attribute, outcomes);
            for impact in &report.impacts {
                if !impact.passes {
                    alerts.push(FairnessAlert {
                        attribute,
                        group: impact.group.clone(),
                        ratio: impact.ratio,
                        floor: self.policy.disparate_impact_floor,
                    });
                }
            }
            reports.push(report);
        }

        info!(
            sample_size = outcomes.len(),
            alerts = alerts.len(),
            "fairness window evaluated"
        );

        FairnessSnapshot {
            window_start,
            window_end,
            sample_size: outcomes.len(),
            reports,
            alerts,
            policy_version: self.policy.version.clone(),
        }
    }

    fn evaluate_attribute(
        &self,
        attribute: ProtectedAttribute,
        outcomes: &[DecisionOutcome],
    ) -> AttributeReport {
        // BTreeMap keeps group order deterministic across runs
        let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for outcome in outcomes {
            let group = match attribute {
                ProtectedAttribute::Gender => outcome.gender.clone(),
                ProtectedAttribute::Region => outcome.region.clone(),
                ProtectedAttribute::AgeGroup => outcome.age_group.to_string(),
            };
            let entry = counts.entry(group).or_insert((0, 0));
            entry.0 += 1;
            if outcome.approved {
                entry.1 += 1;
            }
        }

        let groups: Vec<GroupStats> = counts
            .into_iter()
            .map(|(group, (total, approved))| GroupStats {
                group,
                total,
                approved,
                approval_rate: approved as f64 / total as f64,
            })
            .collect();

        let reference = groups
            .iter()
            .filter(|g| g.total >= self.policy.min_group_sample)
            .max_by(|a, b| {
                a.approval_rate
                    .partial_cmp(&b.approval_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned();

        let impacts = match &reference {
            Some(reference) => groups
                .iter()
                .filter(|g| g.total >= self.policy.min_group_sample)
                .map(|g| {
                    let ratio = if reference.approval_rate == 0.0 {
                        1.0
                    } else {
                        g.approval_rate / reference.approval_rate
                    };
                    DisparateImpact {
                        group: g.group.clone(),
                        ratio,
                        passes: ratio >= self.policy.disparate_impact_floor,
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        AttributeReport {
            attribute,
            groups,
            reference_group: reference.map(|g| g.group),
            impacts,
        }
    }
}
