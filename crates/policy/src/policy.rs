//! Decision policy with configurable thresholds
//!
//! All thresholds are configurable via file, not hardcoded in engine logic.
//! Defaults are conservative. `validate()` must pass before any pipeline is
//! built over the policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{PolicyError, PolicyResult};
use crate::strategy::ScoringStrategy;

/// Named policy parameters for the credit decision pipeline.
///
/// Every branch in the ensemble and every rule predicate reads its bounds
/// from here, so thresholds are independently tunable without code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Version tag recorded on every Decision this policy produces
    #[serde(default = "default_version")]
    pub version: String,

    // === Ensemble thresholds ===
    /// Minimum score for the approval branch
    #[serde(default = "default_score_threshold")]
    pub score_threshold: u8,

    /// Minimum trust score for the approval branch
    #[serde(default = "default_trust_threshold")]
    pub trust_threshold: f64,

    /// Anomaly score must stay strictly below this for approval
    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,

    /// Score below this floor rejects outright
    #[serde(default = "default_reject_score_floor")]
    pub reject_score_floor: u8,

    /// Trust below this floor rejects outright
    #[serde(default = "default_reject_trust_floor")]
    pub reject_trust_floor: f64,

    // === Fraud-ring detection ===
    /// Cluster density at or above this flags a fraud ring
    #[serde(default = "default_fraud_cluster_density_threshold")]
    pub fraud_cluster_density_threshold: f64,

    /// Minimum synchronized-cluster size for a fraud ring
    #[serde(default = "default_fraud_cluster_min_size")]
    pub fraud_cluster_min_size: usize,

    /// Application synchronization window (hours)
    #[serde(default = "default_sync_window_hours")]
    pub sync_window_hours: i64,

    // === Anomaly detection ===
    /// |z| above this triggers a dimension
    #[serde(default = "default_z_trigger")]
    pub z_trigger: f64,

    /// Fewer prior requests than this is a cold start (neutral anomaly)
    #[serde(default = "default_min_history_len")]
    pub min_history_len: usize,

    // === Rule engine ===
    /// Accounts younger than this (days) are hard-rejected
    #[serde(default = "default_min_account_age_days")]
    pub min_account_age_days: i64,

    /// Requested amount may not exceed this multiple of monthly income
    #[serde(default = "default_income_multiple_cap")]
    pub income_multiple_cap: u32,

    /// Burst window for repeat applications (days)
    #[serde(default = "default_burst_window_days")]
    pub burst_window_days: i64,

    /// Applications within the window (including this one) that trigger a flag
    #[serde(default = "default_burst_application_count")]
    pub burst_application_count: u32,

    /// Requests at or above this amount are "large" for flag rules
    #[serde(default = "default_large_request_threshold")]
    pub large_request_threshold: Decimal,

    // === Fairness ===
    /// Four-fifths-rule floor for disparate-impact ratios
    #[serde(default = "default_disparate_impact_floor")]
    pub disparate_impact_floor: f64,

    /// Groups smaller than this are reported but never alerted on
    #[serde(default = "default_min_group_sample")]
    pub min_group_sample: usize,

    // === Strategy ===
    /// Scoring implementation selector (explicit, not ambient)
    #[serde(default)]
    pub scoring_strategy: ScoringStrategy,
}

// Default value functions for serde
fn default_version() -> String {
    "policy-v1".to_string()
}

fn default_score_threshold() -> u8 {
    60
}

fn default_trust_threshold() -> f64 {
    0.5
}

fn default_anomaly_threshold() -> f64 {
    0.7
}

fn default_reject_score_floor() -> u8 {
    40
}

fn default_reject_trust_floor() -> f64 {
    0.3
}

fn default_fraud_cluster_density_threshold() -> f64 {
    0.8
}

fn default_fraud_cluster_min_size() -> usize {
    4
}

fn default_sync_window_hours() -> i64 {
    2
}

fn default_z_trigger() -> f64 {
    2.0
}

fn default_min_history_len() -> usize {
    3
}

fn default_min_account_age_days() -> i64 {
    30
}

fn default_income_multiple_cap() -> u32 {
    10
}

fn default_burst_window_days() -> i64 {
    7
}

fn default_burst_application_count() -> u32 {
    3
}

fn default_large_request_threshold() -> Decimal {
    Decimal::new(20_000, 0)
}

fn default_disparate_impact_floor() -> f64 {
    0.80
}

fn default_min_group_sample() -> usize {
    10
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            version: default_version(),
            score_threshold: default_score_threshold(),
            trust_threshold: default_trust_threshold(),
            anomaly_threshold: default_anomaly_threshold(),
            reject_score_floor: default_reject_score_floor(),
            reject_trust_floor: default_reject_trust_floor(),
            fraud_cluster_density_threshold: default_fraud_cluster_density_threshold(),
            fraud_cluster_min_size: default_fraud_cluster_min_size(),
            sync_window_hours: default_sync_window_hours(),
            z_trigger: default_z_trigger(),
            min_history_len: default_min_history_len(),
            min_account_age_days: default_min_account_age_days(),
            income_multiple_cap: default_income_multiple_cap(),
            burst_window_days: default_burst_window_days(),
            burst_application_count: default_burst_application_count(),
            large_request_threshold: default_large_request_threshold(),
            disparate_impact_floor: default_disparate_impact_floor(),
            min_group_sample: default_min_group_sample(),
            scoring_strategy: ScoringStrategy::default(),
        }
    }
}

impl DecisionPolicy {
    /// Load a policy from a JSON file and validate it
    pub fn from_file(path: &std::path::Path) -> PolicyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let policy: Self = serde_json::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Validate every parameter. Fatal on failure: the pipeline refuses to
    /// run rather than fall back to unsafe bounds.
    pub fn validate(&self) -> PolicyResult<()> {
        if self.version.trim().is_empty() {
            return Err(PolicyError::invalid("version", "must not be empty"));
        }
        if self.score_threshold > 100 {
            return Err(PolicyError::invalid(
                "score_threshold",
                format!("{} exceeds the score range [0,100]", self.score_threshold),
            ));
        }
        if self.reject_score_floor > self.score_threshold {
            return Err(PolicyError::invalid(
                "reject_score_floor",
                format!(
                    "{} is above score_threshold {}",
                    self.reject_score_floor, self.score_threshold
                ),
            ));
        }
        for (name, value) in [
            ("trust_threshold", self.trust_threshold),
            ("anomaly_threshold", self.anomaly_threshold),
            ("reject_trust_floor", self.reject_trust_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::InvalidParameter {
                    parameter: match name {
                        "trust_threshold" => "trust_threshold",
                        "anomaly_threshold" => "anomaly_threshold",
                        _ => "reject_trust_floor",
                    },
                    detail: format!("{value} is outside [0.0, 1.0]"),
                });
            }
        }
        if self.reject_trust_floor > self.trust_threshold {
            return Err(PolicyError::invalid(
                "reject_trust_floor",
                format!(
                    "{} is above trust_threshold {}",
                    self.reject_trust_floor, self.trust_threshold
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.fraud_cluster_density_threshold)
            || self.fraud_cluster_density_threshold == 0.0
        {
            return Err(PolicyError::invalid(
                "fraud_cluster_density_threshold",
                format!(
                    "{} is outside (0.0, 1.0]",
                    self.fraud_cluster_density_threshold
                ),
            ));
        }
        if self.fraud_cluster_min_size < 2 {
            return Err(PolicyError::invalid(
                "fraud_cluster_min_size",
                "a ring needs at least 2 members",
            ));
        }
        if self.sync_window_hours <= 0 {
            return Err(PolicyError::invalid(
                "sync_window_hours",
                "must be positive",
            ));
        }
        if self.z_trigger <= 0.0 {
            return Err(PolicyError::invalid("z_trigger", "must be positive"));
        }
        if self.min_account_age_days < 0 {
            return Err(PolicyError::invalid(
                "min_account_age_days",
                "must not be negative",
            ));
        }
        if self.income_multiple_cap == 0 {
            return Err(PolicyError::invalid(
                "income_multiple_cap",
                "must be at least 1",
            ));
        }
        if self.burst_window_days <= 0 || self.burst_application_count == 0 {
            return Err(PolicyError::invalid(
                "burst_window_days",
                "burst window and count must be positive",
            ));
        }
        if self.large_request_threshold < Decimal::ZERO {
            return Err(PolicyError::invalid(
                "large_request_threshold",
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.disparate_impact_floor)
            || self.disparate_impact_floor == 0.0
        {
            return Err(PolicyError::invalid(
                "disparate_impact_floor",
                format!("{} is outside (0.0, 1.0]", self.disparate_impact_floor),
            ));
        }
        if !self.scoring_strategy.is_rule_based() {
            return Err(PolicyError::invalid(
                "scoring_strategy",
                "no model-based backend is shipped; only rule_based is runnable",
            ));
        }
        Ok(())
    }

    /// Fraud-ring synchronization window as a chrono Duration
    pub fn sync_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.sync_window_hours)
    }

    /// Burst window as a chrono Duration
    pub fn burst_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.burst_window_days)
    }

    /// SHA-256 fingerprint of the full parameter set, recorded on
    /// policy-activation audit events.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        hex::encode(hasher.finalize())
    }
}
