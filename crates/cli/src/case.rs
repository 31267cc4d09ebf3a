//! Case files - one decision's worth of input as a single JSON document
//!
//! A case file bundles the applicant, the request, the account facts, and
//! optionally the raw history rows and peer neighborhood that a deployment
//! would fetch from its stores. Raw rows rather than precomputed stats, so
//! the baseline math stays in one place.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use trustlend_anomaly::HistoricalBaseline;
use trustlend_core::{AccountFacts, Applicant, LoanRequest};
use trustlend_trust::{PeerGraphSnapshot, PeerNode};

/// Past request rows for the applicant, column-wise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRows {
    pub amounts: Vec<Decimal>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub peer_counts: Vec<usize>,
    pub regions: Vec<String>,
}

impl HistoryRows {
    pub fn to_baseline(&self) -> HistoricalBaseline {
        HistoricalBaseline::from_history(
            &self.amounts,
            &self.timestamps,
            &self.peer_counts,
            &self.regions,
        )
    }
}

/// Peer neighborhood as raw nodes and index edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerRows {
    pub peers: Vec<PeerNode>,
    #[serde(default)]
    pub edges: Vec<(usize, usize)>,
}

impl PeerRows {
    pub fn to_snapshot(&self) -> PeerGraphSnapshot {
        PeerGraphSnapshot::new(self.peers.clone(), self.edges.clone())
    }
}

/// Everything one `decide` invocation needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub applicant: Applicant,
    pub request: LoanRequest,
    pub facts: AccountFacts,
    #[serde(default)]
    pub history: Option<HistoryRows>,
    #[serde(default)]
    pub peers: Option<PeerRows>,
}

impl CaseFile {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading case file {}", path.display()))?;
        let case: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing case file {}", path.display()))?;
        Ok(case)
    }
}
