//! TrustLend Trust Graph - Layer 3 of the decision pipeline
//!
//! Computes a 0.0-1.0 trust score from the applicant's peer neighborhood
//! (reputation, diversity, interaction depth) and detects fraud rings:
//! densely interconnected clusters of peers whose applications arrived
//! within a short synchronization window. The graph is a snapshot - a node
//! arena plus an index edge list - cheap to copy and free of ownership
//! cycles, rebuilt per request rather than mutated.

mod analyzer;
mod snapshot;

pub use analyzer::{TrustGraphAnalyzer, TrustResult};
pub use snapshot::{PeerGraphSnapshot, PeerNode};
