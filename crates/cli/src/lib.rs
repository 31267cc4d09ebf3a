//! TrustLend CLI internals

pub mod case;
pub mod commands;
