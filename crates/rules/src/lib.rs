//! TrustLend Rules - Layer 1 of the decision pipeline
//!
//! An ordered list of deterministic predicates over the applicant, the
//! request, and minimal account facts. Each predicate yields PASS, REJECT,
//! or FLAG. The first REJECT short-circuits the pipeline; FLAGs accumulate
//! and are carried forward. No rule performs I/O, and the full evaluation
//! trail is recorded so audit can always answer "which rule fired and why".

mod engine;
mod outcome;

pub use engine::{rule_names, RuleEngine};
pub use outcome::{RuleEvaluation, RuleOutcome, RuleReport};
