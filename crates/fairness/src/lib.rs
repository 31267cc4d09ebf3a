//! TrustLend Fairness - disparate-impact monitoring over decision outcomes
//!
//! An out-of-band observer: it reads completed decisions from the audit
//! ledger on a schedule, aggregates approval rates per protected attribute,
//! and applies the four-fifths rule against the best-performing group. It
//! never sits on the decision path and never blocks a pipeline run.
//! Snapshots are published atomically over a watch channel; readers always
//! see a complete report or the previous one, never a partial.

mod feed;
mod monitor;
mod outcome;
mod scheduler;

pub use feed::{DecisionFeed, FeedError, LedgerFeed};
pub use monitor::{
    AttributeReport, DisparateImpact, FairnessAlert, FairnessMonitor, FairnessSnapshot,
    GroupStats, ProtectedAttribute,
};
pub use outcome::DecisionOutcome;
pub use scheduler::FairnessScheduler;
