//! TrustLend Scoring - deterministic 0-100 credit score
//!
//! Pure function of applicant attributes: base 50 plus additive
//! contributions from a fixed, versioned lookup table, clamped to [0,100].
//! Identical input always yields an identical `ScoreResult`. The approval
//! threshold is a policy parameter, never hardcoded here.

mod engine;

pub use engine::{ScoreComponent, ScoreResult, ScoringEngine, TABLE_VERSION};
