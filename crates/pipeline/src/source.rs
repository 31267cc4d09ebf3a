//! Source traits - the IO seams of a pipeline run
//!
//! Each source is queried exactly once per run. In-memory implementations
//! back tests and the CLI's case files; a deployment wires its stores in
//! behind the same traits.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use trustlend_anomaly::HistoricalBaseline;
use trustlend_core::ApplicantId;
use trustlend_trust::PeerGraphSnapshot;

/// Errors from an upstream store
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("source timed out: {0}")]
    Timeout(String),
}

/// Per-applicant rolling baseline from the historical store.
/// `Ok(None)` means the applicant has no recorded history at all.
pub trait HistoricalSource: Send + Sync {
    fn baseline(&self, applicant: &ApplicantId) -> Result<Option<HistoricalBaseline>, SourceError>;
}

/// Per-applicant peer neighborhood from the relationship store
pub trait PeerSnapshotSource: Send + Sync {
    fn snapshot(&self, applicant: &ApplicantId) -> Result<PeerGraphSnapshot, SourceError>;
}

/// Map-backed historical source
#[derive(Default)]
pub struct InMemoryHistory {
    baselines: Mutex<HashMap<String, HistoricalBaseline>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, applicant: &ApplicantId, baseline: HistoricalBaseline) {
        self.baselines
            .lock()
            .expect("history map lock")
            .insert(applicant.as_str().to_string(), baseline);
    }
}

impl HistoricalSource for InMemoryHistory {
    fn baseline(&self, applicant: &ApplicantId) -> Result<Option<HistoricalBaseline>, SourceError> {
        let baselines = self
            .baselines
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(baselines.get(applicant.as_str()).cloned())
    }
}

/// Map-backed peer source; unknown applicants get an empty neighborhood
#[derive(Default)]
pub struct InMemoryPeers {
    snapshots: Mutex<HashMap<String, PeerGraphSnapshot>>,
}

impl InMemoryPeers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, applicant: &ApplicantId, snapshot: PeerGraphSnapshot) {
        self.snapshots
            .lock()
            .expect("peer map lock")
            .insert(applicant.as_str().to_string(), snapshot);
    }
}

impl PeerSnapshotSource for InMemoryPeers {
    fn snapshot(&self, applicant: &ApplicantId) -> Result<PeerGraphSnapshot, SourceError> {
        let snapshots = self
            .snapshots
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(snapshots
            .get(applicant.as_str())
            .cloned()
            .unwrap_or_else(PeerGraphSnapshot::empty))
    }
}
