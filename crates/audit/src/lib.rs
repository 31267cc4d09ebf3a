//! TrustLend Audit - the append-only decision ledger
//!
//! Every Decision is handed off as one complete, self-contained record on a
//! SHA-256 hash chain; overrides and appeals are later records referencing
//! the decision id, never mutations. This is the only shared mutable
//! resource in the system, and it is write-once-per-decision, read-many.

mod error;
mod event;
mod ledger;

pub use error::{AuditError, AuditResult};
pub use event::AuditEvent;
pub use ledger::{verify_records, DecisionLedger, LedgerRecord, GENESIS_HASH};
