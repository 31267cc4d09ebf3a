//! Anomaly detector - per-dimension z-scores with cold-start neutrality

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use trustlend_core::LoanRequest;
use trustlend_policy::DecisionPolicy;

use crate::baseline::HistoricalBaseline;

/// Anomaly score for an applicant with too little history. Deliberately
/// neither 0 nor 1: the absence of history is weak evidence either way.
const COLD_START_SCORE: f64 = 0.5;

/// Fixed z assigned to a never-before-seen region. Region labels have no
/// distribution to standardize against, so novelty gets a flat surprise
/// weight just above the trigger.
const GEO_NOVELTY_Z: f64 = 3.0;

/// Monitored anomaly dimensions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyKind {
    Amount,
    Velocity,
    Peer,
    Geographic,
}

/// One triggered dimension with its z-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySignal {
    pub kind: AnomalyKind,
    pub z_score: f64,
}

/// Outcome of one anomaly check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Bounded aggregate of triggered z-scores, in [0,1]
    pub anomaly_score: f64,
    /// Dimensions that triggered, with their z-scores
    pub signals: Vec<AnomalySignal>,
    /// True when the applicant had too little history to judge
    pub insufficient_history: bool,
}

impl AnomalyResult {
    fn cold_start() -> Self {
        Self {
            anomaly_score: COLD_START_SCORE,
            signals: Vec::new(),
            insufficient_history: true,
        }
    }
}

/// Layer 2 detector. Reads the baseline, never writes anywhere.
pub struct AnomalyDetector {
    policy: DecisionPolicy,
}

impl AnomalyDetector {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Check a request against the applicant's baseline.
    ///
    /// `current_peer_count` comes from the peer snapshot fetched for the
    /// same request; `region` from the applicant. A missing baseline is the
    /// same cold-start path as a short one.
    pub fn detect(
        &self,
        request: &LoanRequest,
        region: &str,
        current_peer_count: usize,
        baseline: Option<&HistoricalBaseline>,
    ) -> AnomalyResult {
        let baseline = match baseline {
            Some(b) if b.history_len >= self.policy.min_history_len => b,
            _ => return AnomalyResult::cold_start(),
        };

        let mut signals = Vec::new();

        if let Some(z) = self.amount_z(request, baseline) {
            signals.push(AnomalySignal {
                kind: AnomalyKind::Amount,
                z_score: z,
            });
        }
        if let Some(z) = self.velocity_z(request, baseline) {
            signals.push(AnomalySignal {
                kind: AnomalyKind::Velocity,
                z_score: z,
            });
        }
        if let Some(z) = self.peer_z(current_peer_count, baseline) {
            signals.push(AnomalySignal {
                kind: AnomalyKind::Peer,
                z_score: z,
            });
        }
        if !baseline.known_regions.is_empty() && !baseline.knows_region(region) {
            signals.push(AnomalySignal {
                kind: AnomalyKind::Geographic,
                z_score: GEO_NOVELTY_Z,
            });
        }

        let anomaly_score = self.aggregate(&signals);

        AnomalyResult {
            anomaly_score,
            signals,
            insufficient_history: false,
        }
    }

    /// Returns the z only when the dimension triggered. Zero or undefined
    /// standard deviation means insufficient spread to judge: neutral.
    fn amount_z(&self, request: &LoanRequest, baseline: &HistoricalBaseline) -> Option<f64> {
        let (mean, std) = baseline.amount_stats_f64();
        if std <= 0.0 {
            return None;
        }
        let current = request.amount.value().to_f64()?;
        let z = (current - mean) / std;
        (z.abs() > self.policy.z_trigger).then_some(z)
    }

    /// Shorter-than-usual gaps read as positive z, so bursts surface the
    /// same way oversized amounts do.
    fn velocity_z(&self, request: &LoanRequest, baseline: &HistoricalBaseline) -> Option<f64> {
        let gaps = baseline.gap_seconds();
        if gaps.len() < 2 {
            return None;
        }
        let n = gaps.len() as f64;
        let mean = gaps.iter().sum::<f64>() / n;
        let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        if std <= 0.0 {
            return None;
        }

        let last = baseline.past_timestamps.last()?;
        let current_gap = (request.submitted_at - *last).num_seconds() as f64;
        let z = (mean - current_gap) / std;
        (z.abs() > self.policy.z_trigger).then_some(z)
    }

    fn peer_z(&self, current_peer_count: usize, baseline: &HistoricalBaseline) -> Option<f64> {
        if baseline.peer_count_std <= 0.0 {
            return None;
        }
        let z = (current_peer_count as f64 - baseline.peer_count_mean) / baseline.peer_count_std;
        (z.abs() > self.policy.z_trigger).then_some(z)
    }

    /// Normalized max of the triggered z-scores: |z| at the trigger maps to
    /// 0.5, twice the trigger saturates at 1.0.
    fn aggregate(&self, signals: &[AnomalySignal]) -> f64 {
        let max_abs = signals
            .iter()
            .map(|s| s.z_score.abs())
            .fold(0.0_f64, f64::max);
        if max_abs == 0.0 {
            0.0
        } else {
            (max_abs / (2.0 * self.policy.z_trigger)).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use trustlend_core::{Amount, ApplicantId};

    fn request(amount: Decimal) -> LoanRequest {
        LoanRequest {
            applicant_id: ApplicantId::new("APP-001"),
            amount: Amount::new(amount).unwrap(),
            purpose: "inventory".to_string(),
            submitted_at: Utc::now(),
        }
    }

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(DecisionPolicy::default())
    }

    /// Baseline with mean 7000 and std 2000 over five requests, monthly cadence
    fn baseline() -> HistoricalBaseline {
        let now = Utc::now();
        let timestamps: Vec<_> = (1..=5)
            .rev()
            .map(|i| now - Duration::days(30 * i))
            .collect();
        HistoricalBaseline {
            amount_mean: dec!(7000),
            amount_std: dec!(2000),
            past_timestamps: timestamps,
            peer_count_mean: 5.0,
            peer_count_std: 1.0,
            known_regions: vec!["north".to_string()],
            history_len: 5,
        }
    }

    #[test]
    fn test_cold_start_is_neutral() {
        let result = detector().detect(&request(dec!(50000)), "north", 5, None);

        assert_eq!(result.anomaly_score, 0.5);
        assert!(result.insufficient_history);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn test_short_history_is_cold_start() {
        let short = HistoricalBaseline::from_history(
            &[dec!(5000), dec!(6000)],
            &[],
            &[],
            &[],
        );
        let result = detector().detect(&request(dec!(50000)), "north", 5, Some(&short));
        assert!(result.insufficient_history);
        assert_eq!(result.anomaly_score, 0.5);
    }

    #[test]
    fn test_oversized_amount_saturates() {
        // z = (50000 - 7000) / 2000 = 21.5
        let result = detector().detect(&request(dec!(50000)), "north", 5, Some(&baseline()));

        let amount_signal = result
            .signals
            .iter()
            .find(|s| s.kind == AnomalyKind::Amount)
            .expect("amount dimension should trigger");
        assert!((amount_signal.z_score - 21.5).abs() < 1e-9);
        assert_eq!(result.anomaly_score, 1.0);
        assert!(!result.insufficient_history);
    }

    #[test]
    fn test_typical_amount_no_trigger() {
        let result = detector().detect(&request(dec!(7500)), "north", 5, Some(&baseline()));

        assert!(result
            .signals
            .iter()
            .all(|s| s.kind != AnomalyKind::Amount));
    }

    #[test]
    fn test_zero_std_is_neutral_not_divide_by_zero() {
        let mut b = baseline();
        b.amount_std = Decimal::ZERO;
        b.peer_count_std = 0.0;

        let result = detector().detect(&request(dec!(50000)), "north", 100, Some(&b));
        assert!(result
            .signals
            .iter()
            .all(|s| s.kind != AnomalyKind::Amount && s.kind != AnomalyKind::Peer));
    }

    #[test]
    fn test_rapid_reapplication_triggers_velocity() {
        // Monthly cadence with ~uniform gaps has low std; perturb one gap so
        // std is non-zero, then apply within an hour of the last request.
        let now = Utc::now();
        let mut b = baseline();
        b.past_timestamps = vec![
            now - Duration::days(120),
            now - Duration::days(88), // 32-day gap
            now - Duration::days(60), // 28-day gap
            now - Duration::days(30), // 30-day gap
            now - Duration::hours(1),
        ];

        let result = detector().detect(&request(dec!(7000)), "north", 5, Some(&b));
        let velocity = result
            .signals
            .iter()
            .find(|s| s.kind == AnomalyKind::Velocity)
            .expect("velocity should trigger");
        assert!(velocity.z_score > 0.0);
    }

    #[test]
    fn test_unseen_region_triggers_geographic() {
        let result = detector().detect(&request(dec!(7000)), "south", 5, Some(&baseline()));

        let geo = result
            .signals
            .iter()
            .find(|s| s.kind == AnomalyKind::Geographic)
            .expect("geographic should trigger");
        assert_eq!(geo.z_score, 3.0);
        assert!(result.anomaly_score > 0.0);
    }

    #[test]
    fn test_peer_count_spike_triggers() {
        let result = detector().detect(&request(dec!(7000)), "north", 20, Some(&baseline()));

        let peer = result
            .signals
            .iter()
            .find(|s| s.kind == AnomalyKind::Peer)
            .expect("peer dimension should trigger");
        assert!(peer.z_score > 2.0);
    }

    #[test]
    fn test_score_bounds() {
        let d = detector();
        for amount in [dec!(1), dec!(7000), dec!(50000), dec!(1000000)] {
            let result = d.detect(&request(amount), "south", 50, Some(&baseline()));
            assert!((0.0..=1.0).contains(&result.anomaly_score));
        }
    }

    #[test]
    fn test_no_triggers_scores_zero() {
        let result = detector().detect(&request(dec!(7000)), "north", 5, Some(&baseline()));
        if result.signals.is_empty() {
            assert_eq!(result.anomaly_score, 0.0);
        }
    }
}
