//! TrustLend Anomaly - Layer 2 of the decision pipeline
//!
//! Compares the current request against the applicant's own historical
//! behavior, one z-score per monitored dimension. A dimension triggers at
//! |z| above the policy trigger; the overall score is a bounded aggregate
//! of the triggered z-scores, clamped to [0,1]. Applicants with too little
//! history get a conservative neutral score of 0.5 - never zero, never one,
//! and never a divide-by-zero.

mod baseline;
mod detector;

pub use baseline::HistoricalBaseline;
pub use detector::{AnomalyDetector, AnomalyKind, AnomalyResult, AnomalySignal};
