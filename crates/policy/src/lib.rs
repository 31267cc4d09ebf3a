//! TrustLend Policy
//!
//! Every threshold and weight the pipeline consults lives here as a named
//! parameter. The pipeline refuses to run with an invalid policy rather
//! than silently defaulting to unsafe bounds, and each Decision records the
//! policy version that produced it so "what-if" simulation is a config
//! change, not a code change.

mod error;
mod policy;
mod strategy;

pub use error::{PolicyError, PolicyResult};
pub use policy::DecisionPolicy;
pub use strategy::ScoringStrategy;
