//! Per-applicant rolling baseline - read-only input from the historical store

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rolling statistics over an applicant's past requests.
///
/// Supplied by the historical store once per decision; the core only ever
/// reads it. `history_len` is the number of prior requests the stats were
/// computed over - the detector treats short histories as a cold start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBaseline {
    /// Mean of past requested amounts
    pub amount_mean: Decimal,
    /// Population standard deviation of past requested amounts
    pub amount_std: Decimal,
    /// Submission timestamps of past requests, oldest first
    pub past_timestamps: Vec<DateTime<Utc>>,
    /// Mean peer count observed on past requests
    pub peer_count_mean: f64,
    /// Population standard deviation of past peer counts
    pub peer_count_std: f64,
    /// Regions seen on past requests
    pub known_regions: Vec<String>,
    /// Number of prior requests behind these stats
    pub history_len: usize,
}

impl HistoricalBaseline {
    /// Build a baseline from raw history rows (used by store adapters and
    /// tests). Timestamps are sorted; stats use the population deviation.
    pub fn from_history(
        amounts: &[Decimal],
        timestamps: &[DateTime<Utc>],
        peer_counts: &[usize],
        regions: &[String],
    ) -> Self {
        let (amount_mean, amount_std) = decimal_stats(amounts);
        let peer_values: Vec<f64> = peer_counts.iter().map(|&c| c as f64).collect();
        let (peer_count_mean, peer_count_std) = f64_stats(&peer_values);

        let mut past_timestamps = timestamps.to_vec();
        past_timestamps.sort();

        let mut known_regions: Vec<String> =
            regions.iter().map(|r| r.to_lowercase()).collect();
        known_regions.sort();
        known_regions.dedup();

        Self {
            amount_mean,
            amount_std,
            past_timestamps,
            peer_count_mean,
            peer_count_std,
            known_regions,
            history_len: amounts.len(),
        }
    }

    /// Whether a region was seen on any past request
    pub fn knows_region(&self, region: &str) -> bool {
        let region = region.to_lowercase();
        self.known_regions.iter().any(|r| *r == region)
    }

    /// Amount stats as f64 for z-score math
    pub fn amount_stats_f64(&self) -> (f64, f64) {
        (
            self.amount_mean.to_f64().unwrap_or(0.0),
            self.amount_std.to_f64().unwrap_or(0.0),
        )
    }

    /// Gaps between consecutive past requests, in seconds
    pub fn gap_seconds(&self) -> Vec<f64> {
        self.past_timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds() as f64)
            .collect()
    }
}

fn decimal_stats(values: &[Decimal]) -> (Decimal, Decimal) {
    if values.is_empty() {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    let n = Decimal::from(values.len());
    let mean = values.iter().copied().sum::<Decimal>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let d = *v - mean;
            d * d
        })
        .sum::<Decimal>()
        / n;
    let std = variance
        .to_f64()
        .map(|v| Decimal::from_f64_retain(v.sqrt()).unwrap_or(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO);
    (mean, std)
}

fn f64_stats(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
