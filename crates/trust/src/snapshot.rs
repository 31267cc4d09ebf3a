//! Peer graph snapshot - arena of nodes plus an index edge list
//!
//! Every node is a peer of the applicant (the applicant-to-peer edges are
//! implicit); the explicit edges are peer-to-peer relationships. Indices
//! into the arena replace pointers, so snapshots copy cheaply and cycles in
//! the underlying relationship graph cause no ownership problems.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One peer in the applicant's neighborhood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerNode {
    /// Peer identity handle
    pub handle: String,
    /// Whether this peer has defaulted on a loan
    pub defaulted: bool,
    /// Interactions between the applicant and this peer
    pub interaction_count: u64,
    /// Age of the relationship in days
    pub relationship_age_days: i64,
    /// When this peer last submitted a loan application, if known
    pub last_application_at: Option<DateTime<Utc>>,
}

/// Immutable snapshot of the applicant's local peer neighborhood.
///
/// Supplied once per decision by the historical store; never mutated by
/// the core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeerGraphSnapshot {
    peers: Vec<PeerNode>,
    /// Normalized peer-to-peer edges: index pairs with a < b, deduplicated
    edges: Vec<(usize, usize)>,
}

impl PeerGraphSnapshot {
    /// Build a snapshot, normalizing the edge list: self-loops and
    /// out-of-range indices are dropped, duplicates collapsed.
    pub fn new(peers: Vec<PeerNode>, edges: Vec<(usize, usize)>) -> Self {
        let n = peers.len();
        let mut normalized: Vec<(usize, usize)> = edges
            .into_iter()
            .filter(|&(a, b)| a != b && a < n && b < n)
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        normalized.sort_unstable();
        normalized.dedup();

        Self {
            peers,
            edges: normalized,
        }
    }

    /// Snapshot with no peers at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn peers(&self) -> &[PeerNode] {
        &self.peers
    }

    pub fn defaulted_count(&self) -> usize {
        self.peers.iter().filter(|p| p.defaulted).count()
    }

    pub fn total_interactions(&self) -> u64 {
        self.peers.iter().map(|p| p.interaction_count).sum()
    }

    /// Indices of peers adjacent to `index`
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter_map(|&(a, b)| {
                if a == index {
                    Some(b)
                } else if b == index {
                    Some(a)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Count edges whose endpoints both lie in `subset` (sorted or not)
    pub fn edges_within(&self, subset: &[usize]) -> usize {
        self.edges
            .iter()
            .filter(|(a, b)| subset.contains(a) && subset.contains(b))
            .count()
    }

    /// Density of the induced subgraph over `subset`:
    /// actual edges / possible edges. Zero for fewer than two members.
    pub fn density(&self, subset: &[usize]) -> f64 {
        let k = subset.len();
        if k < 2 {
            return 0.0;
        }
        let possible = (k * (k - 1)) / 2;
        self.edges_within(subset) as f64 / possible as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(handle: &str) -> PeerNode {
        PeerNode {
            handle: handle.to_string(),
            defaulted: false,
            interaction_count: 10,
            relationship_age_days: 100,
            last_application_at: None,
        }
    }

    #[test]
    fn test_edge_normalization() {
        let snapshot = PeerGraphSnapshot::new(
            vec![peer("a"), peer("b"), peer("c")],
            vec![(1, 0), (0, 1), (2, 2), (0, 7), (1, 2)],
        );

        // (1,0) and (0,1) collapse, self-loop and out-of-range drop
        assert_eq!(snapshot.edges_within(&[0, 1, 2]), 2);
    }

    #[test]
    fn test_neighbors() {
        let snapshot = PeerGraphSnapshot::new(
            vec![peer("a"), peer("b"), peer("c")],
            vec![(0, 1), (1, 2)],
        );

        assert_eq!(snapshot.neighbors(1), vec![0, 2]);
        assert_eq!(snapshot.neighbors(0), vec![1]);
    }

    #[test]
    fn test_density_complete_triangle() {
        let snapshot = PeerGraphSnapshot::new(
            vec![peer("a"), peer("b"), peer("c")],
            vec![(0, 1), (1, 2), (0, 2)],
        );

        assert_eq!(snapshot.density(&[0, 1, 2]), 1.0);
        assert_eq!(snapshot.density(&[0, 1]), 1.0);
        assert_eq!(snapshot.density(&[0]), 0.0);
    }

    #[test]
    fn test_density_sparse() {
        let snapshot = PeerGraphSnapshot::new(
            vec![peer("a"), peer("b"), peer("c"), peer("d")],
            vec![(0, 1)],
        );

        // 1 edge of 6 possible
        assert!((snapshot.density(&[0, 1, 2, 3]) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = PeerGraphSnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.peer_count(), 0);
        assert_eq!(snapshot.defaulted_count(), 0);
        assert_eq!(snapshot.total_interactions(), 0);
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let snapshot = PeerGraphSnapshot::new(
            vec![peer("a"), peer("b")],
            vec![(0, 1)],
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: PeerGraphSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
