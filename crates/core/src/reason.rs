//! Reason codes - wire-stable identifiers for decision reasons
//!
//! Every reason attached to a Decision is one of these codes. Rules,
//! ensemble, explanations, and the audit ledger all share them, so the
//! technical and plain-language renderings can never diverge in substance.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Stable reason codes carried on decisions and ledger records
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    // Rule engine
    AccountTooNew,
    AmountOverIncomeCap,
    ApplicationBurst,
    UnemployedLargeRequest,

    // Trust layer
    FraudRingDetected,

    // Ensemble branches
    AllChecksPassed,
    ScoreBelowFloor,
    TrustBelowFloor,
    ScoreBelowThreshold,
    TrustBelowThreshold,
    AnomalyAboveThreshold,

    // Fail-closed path
    InsufficientInformation,
}

impl ReasonCode {
    /// Stable string code (e.g. for ledger records and localization keys)
    pub fn code(&self) -> String {
        self.to_string()
    }
}
