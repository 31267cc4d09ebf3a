//! TrustLend Ensemble - merges all signal layers into one Decision
//!
//! The aggregator evaluates five branches in strict priority order: rule
//! reject, fraud-ring override, approval, floor reject, manual review. The
//! resulting Decision records which branch fired and the exact component
//! values it saw, so any decision is reproducible from its own record plus
//! the policy version - the audit invariant of the whole system.

mod aggregator;
mod decision;

pub use aggregator::EnsembleAggregator;
pub use decision::{Decision, DecisionBranch, Verdict};
