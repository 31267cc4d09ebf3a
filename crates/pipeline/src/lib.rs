//! TrustLend Pipeline - one request in, one Decision out
//!
//! The pipeline owns the run order: validate, rules, then scoring, anomaly
//! and trust over data fetched once per run, then the ensemble, then the
//! explanations, then the audit append. Engines are pure; all IO lives at
//! the edges behind the source traits, so a run is deterministic given its
//! inputs. Upstream failures fail closed to manual review - the pipeline
//! never approves on missing data.

mod error;
mod pipeline;
mod source;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{DecisionPipeline, DecisionRun};
pub use source::{HistoricalSource, InMemoryHistory, InMemoryPeers, PeerSnapshotSource, SourceError};
