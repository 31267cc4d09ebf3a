//! Trust score computation and fraud-ring detection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use trustlend_policy::DecisionPolicy;

use crate::snapshot::PeerGraphSnapshot;

/// Component weights of the trust score
const W_REPUTATION: f64 = 0.50;
const W_DIVERSITY: f64 = 0.25;
const W_DEPTH: f64 = 0.25;

/// Peer count at which network diversity saturates
const DIVERSITY_SATURATION: f64 = 20.0;
/// Total interactions at which interaction depth saturates
const DEPTH_SATURATION: f64 = 100.0;
/// Cluster size at which the size term of the ring probability saturates
const RING_SIZE_SATURATION: f64 = 10.0;

/// Reputation component when there are no peers to judge by
const NEUTRAL_REPUTATION: f64 = 0.5;

/// Length of the hex cluster identifier
const CLUSTER_ID_LEN: usize = 16;

/// Outcome of one trust-graph analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustResult {
    /// Weighted aggregate in [0,1]
    pub trust_score: f64,
    /// 1 - defaulted fraction (0.5 neutral with zero peers)
    pub peer_reputation: f64,
    /// min(peer_count / 20, 1)
    pub network_diversity: f64,
    /// min(total interactions / 100, 1)
    pub interaction_depth: f64,
    /// Whether a synchronized dense cluster was found
    pub fraud_ring_detected: bool,
    /// Monotonic in cluster density, size, and defaulted fraction
    pub fraud_ring_probability: f64,
    /// Shared identifier of the cluster, for cross-referencing members
    pub cluster_id: Option<String>,
    /// Handles of the synchronized cluster members
    pub ring_members: Vec<String>,
}

/// Layer 3 analyzer. Pure function of the snapshot and the request time.
pub struct TrustGraphAnalyzer {
    policy: DecisionPolicy,
}

impl TrustGraphAnalyzer {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Analyze the applicant's peer neighborhood as of `submitted_at`.
    pub fn analyze(
        &self,
        snapshot: &PeerGraphSnapshot,
        submitted_at: DateTime<Utc>,
    ) -> TrustResult {
        let peer_count = snapshot.peer_count();

        let peer_reputation = if peer_count == 0 {
            NEUTRAL_REPUTATION
        } else {
            1.0 - snapshot.defaulted_count() as f64 / peer_count as f64
        };
        let network_diversity = (peer_count as f64 / DIVERSITY_SATURATION).min(1.0);
        let interaction_depth =
            (snapshot.total_interactions() as f64 / DEPTH_SATURATION).min(1.0);

        let trust_score = (W_REPUTATION * peer_reputation
            + W_DIVERSITY * network_diversity
            + W_DEPTH * interaction_depth)
            .clamp(0.0, 1.0);

        let ring = self.detect_ring(snapshot, submitted_at);

        if ring.detected {
            tracing::warn!(
                cluster_id = ring.cluster_id.as_deref().unwrap_or(""),
                size = ring.members.len(),
                probability = ring.probability,
                "fraud ring detected"
            );
        }

        TrustResult {
            trust_score,
            peer_reputation,
            network_diversity,
            interaction_depth,
            fraud_ring_detected: ring.detected,
            fraud_ring_probability: ring.probability,
            cluster_id: ring.cluster_id,
            ring_members: ring.members,
        }
    }

    fn detect_ring(&self, snapshot: &PeerGraphSnapshot, submitted_at: DateTime<Utc>) -> Ring {
        let window = self.policy.sync_window();

        // Peers whose own application landed inside the synchronization
        // window around this request.
        let synced: Vec<usize> = snapshot
            .peers()
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                p.last_application_at.and_then(|at| {
                    let gap = if at > submitted_at {
                        at - submitted_at
                    } else {
                        submitted_at - at
                    };
                    (gap <= window).then_some(i)
                })
            })
            .collect();

        if synced.len() < self.policy.fraud_cluster_min_size {
            return Ring::none();
        }

        let density = snapshot.density(&synced);
        let defaulted_fraction = synced
            .iter()
            .filter(|&&i| snapshot.peers()[i].defaulted)
            .count() as f64
            / synced.len() as f64;

        let size_term = (synced.len() as f64 / RING_SIZE_SATURATION).min(1.0);
        let probability =
            (0.5 * density + 0.25 * size_term + 0.25 * defaulted_fraction).clamp(0.0, 1.0);

        let mut members: Vec<String> = synced
            .iter()
            .map(|&i| snapshot.peers()[i].handle.clone())
            .collect();
        members.sort();

        let detected = density >= self.policy.fraud_cluster_density_threshold;

        Ring {
            detected,
            probability,
            cluster_id: detected.then(|| cluster_id(&members)),
            members,
        }
    }
}

struct Ring {
    detected: bool,
    probability: f64,
    cluster_id: Option<String>,
    members: Vec<String>,
}

impl Ring {
    fn none() -> Self {
        Self {
            detected: false,
            probability: 0.0,
            cluster_id: None,
            members: Vec::new(),
        }
    }
}

/// Deterministic shared identifier: SHA-256 over the sorted member handles.
/// Every member application of the same cluster gets the same id.
fn cluster_id(sorted_members: &[String]) -> String {
    let mut hasher = Sha256::new();
    for handle in sorted_members {
        hasher.update(handle.as_bytes());
        hasher.update(b"|");
    }
    hex::encode(hasher.finalize())[..CLUSTER_ID_LEN].to_string()
}
