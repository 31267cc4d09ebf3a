//! TrustLend Explain - audience-specific renderings of a Decision
//!
//! Two renderings of the same structured reason set: a technical breakdown
//! for compliance audiences and a plain-language one for the applicant,
//! emitted as language-agnostic keys plus parameters so the localization
//! collaborator can translate without parsing prose. The generator holds no
//! decision logic; both renderings derive deterministically from the
//! Decision, so they can never diverge in substance.

mod generator;

pub use generator::{ExplanationGenerator, Explanations, PlainReason};
