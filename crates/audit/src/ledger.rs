//! Append-only, hash-chained JSONL ledger
//!
//! Each record links to its predecessor through a SHA-256 hash over
//! (sequence, prev_hash, event payload); the first record links to the
//! literal "GENESIS". Tampering with any stored record breaks every
//! link after it, which `verify_chain` detects.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{AuditError, AuditResult};
use crate::event::AuditEvent;

/// Anchor hash of the first record in every ledger file
pub const GENESIS_HASH: &str = "GENESIS";

/// One chained record as stored on disk, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Position in the chain, starting at 0
    pub sequence: u64,
    /// Hash of the previous record, or `GENESIS` for the first
    pub prev_hash: String,
    /// SHA-256 over (sequence, prev_hash, event payload)
    pub hash: String,
    /// The event itself
    pub event: AuditEvent,
}

impl LedgerRecord {
    fn seal(sequence: u64, prev_hash: String, event: AuditEvent) -> AuditResult<Self> {
        let hash = compute_hash(sequence, &prev_hash, &event)?;
        Ok(Self {
            sequence,
            prev_hash,
            hash,
            event,
        })
    }
}

fn compute_hash(sequence: u64, prev_hash: &str, event: &AuditEvent) -> AuditResult<String> {
    let payload = serde_json::to_string(event)?;
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(payload.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Verify a slice of records as one contiguous chain from genesis.
pub fn verify_records(records: &[LedgerRecord]) -> AuditResult<()> {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, record) in records.iter().enumerate() {
        let expected_sequence = i as u64;
        if record.sequence != expected_sequence {
            return Err(AuditError::InvalidSequence {
                expected: expected_sequence,
                actual: record.sequence,
            });
        }
        if record.prev_hash != prev_hash {
            return Err(AuditError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }
        let recomputed = compute_hash(record.sequence, &record.prev_hash, &record.event)?;
        if recomputed != record.hash {
            return Err(AuditError::InvalidHash {
                sequence: record.sequence,
            });
        }
        prev_hash = record.hash.clone();
    }

    Ok(())
}

/// The audit ledger.
///
/// File-backed in production, memory-only in tests. Either way the full
/// chain is held in memory for reads; appends go to the file (when backed)
/// before the in-memory chain is extended.
pub struct DecisionLedger {
    path: Option<PathBuf>,
    records: Vec<LedgerRecord>,
}

impl DecisionLedger {
    /// Open (or create) a file-backed ledger, replaying any existing records
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            read_records(&path)?
        } else {
            Vec::new()
        };
        info!(path = %path.display(), records = records.len(), "audit ledger opened");
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    /// Memory-only ledger for tests
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Vec::new(),
        }
    }

    /// Append one event, sealing it onto the chain. Returns the sequence
    /// the record landed at.
    pub fn append(&mut self, event: AuditEvent) -> AuditResult<u64> {
        let sequence = self.records.len() as u64;
        let prev_hash = self
            .records
            .last()
            .map(|r| r.hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        let record = LedgerRecord::seal(sequence, prev_hash, event)?;

        if let Some(path) = &self.path {
            let line = serde_json::to_string(&record)?;
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{line}")?;
            file.sync_all()?;
        }

        info!(
            sequence,
            kind = record.event.kind(),
            "audit event appended"
        );
        self.records.push(record);
        Ok(sequence)
    }

    /// All records, oldest first
    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Verify the whole chain from genesis
    pub fn verify_chain(&self) -> AuditResult<()> {
        verify_records(&self.records)
    }
}

fn read_records(path: &Path) -> AuditResult<Vec<LedgerRecord>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use trustlend_core::{Amount, Applicant, ApplicantId, EmploymentCategory, ReasonCode};
    use trustlend_ensemble::{Decision, DecisionBranch, Verdict};

    fn sample_decision(id: &str) -> Decision {
        Decision {
            id: id.to_string(),
            applicant_id: ApplicantId::new("APP-001"),
            verdict: Verdict::Approved,
            branch: DecisionBranch::AllClear,
            reasons: vec![ReasonCode::AllChecksPassed],
            score: None,
            trust: None,
            anomaly: None,
            rule_report: None,
            policy_version: "policy-v1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn sample_applicant() -> Applicant {
        Applicant {
            id: ApplicantId::new("APP-001"),
            age: 30,
            monthly_income: Amount::new(dec!(25000)).unwrap(),
            employment: EmploymentCategory::Salaried,
            has_bank_account: true,
            region: "north".to_string(),
            gender: "female".to_string(),
        }
    }

    #[test]
    fn test_append_chains_from_genesis() {
        let mut ledger = DecisionLedger::in_memory();
        ledger
            .append(AuditEvent::policy_activated("policy-v1", "abc123"))
            .unwrap();
        ledger
            .append(AuditEvent::decision_recorded(
                sample_decision("d-1"),
                &sample_applicant(),
            ))
            .unwrap();

        let records = ledger.records();
        assert_eq!(records[0].sequence, 0);
        assert_eq!(records[0].prev_hash, GENESIS_HASH);
        assert_eq!(records[1].prev_hash, records[0].hash);
        ledger.verify_chain().unwrap();
    }

    #[test]
    fn test_file_ledger_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        {
            let mut ledger = DecisionLedger::open(&path).unwrap();
            ledger
                .append(AuditEvent::policy_activated("policy-v1", "abc123"))
                .unwrap();
            ledger
                .append(AuditEvent::decision_recorded(
                    sample_decision("d-1"),
                    &sample_applicant(),
                ))
                .unwrap();
        }

        let mut reopened = DecisionLedger::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        reopened.verify_chain().unwrap();

        // Appends continue the existing chain
        reopened
            .append(AuditEvent::officer_override(
                "d-1",
                Verdict::Rejected,
                "officer-7",
                "documents failed verification",
            ))
            .unwrap();
        assert_eq!(reopened.records()[2].sequence, 2);
        reopened.verify_chain().unwrap();
    }

    #[test]
    fn test_tampered_event_fails_verification() {
        let mut ledger = DecisionLedger::in_memory();
        ledger
            .append(AuditEvent::policy_activated("policy-v1", "abc123"))
            .unwrap();
        ledger
            .append(AuditEvent::policy_activated("policy-v2", "def456"))
            .unwrap();

        let mut tampered = ledger.records().to_vec();
        tampered[0].event = AuditEvent::policy_activated("policy-v9", "abc123");

        match verify_records(&tampered) {
            Err(AuditError::InvalidHash { sequence }) => assert_eq!(sequence, 0),
            other => panic!("expected InvalidHash, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_link_detected() {
        let mut ledger = DecisionLedger::in_memory();
        ledger
            .append(AuditEvent::policy_activated("policy-v1", "abc123"))
            .unwrap();
        ledger
            .append(AuditEvent::policy_activated("policy-v2", "def456"))
            .unwrap();

        let mut tampered = ledger.records().to_vec();
        tampered[1].prev_hash = "0".repeat(64);
        // Keep the record's own hash consistent so only the link is broken
        tampered[1].hash =
            compute_hash(1, &tampered[1].prev_hash, &tampered[1].event).unwrap();

        match verify_records(&tampered) {
            Err(AuditError::BrokenLink { sequence, .. }) => assert_eq!(sequence, 1),
            other => panic!("expected BrokenLink, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_gap_detected() {
        let mut ledger = DecisionLedger::in_memory();
        ledger
            .append(AuditEvent::policy_activated("policy-v1", "abc123"))
            .unwrap();
        ledger
            .append(AuditEvent::policy_activated("policy-v2", "def456"))
            .unwrap();
        ledger
            .append(AuditEvent::policy_activated("policy-v3", "fed789"))
            .unwrap();

        let mut truncated = ledger.records().to_vec();
        truncated.remove(1);

        assert!(matches!(
            verify_records(&truncated),
            Err(AuditError::InvalidSequence {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_decision_record_is_self_contained() {
        let mut ledger = DecisionLedger::in_memory();
        ledger
            .append(AuditEvent::decision_recorded(
                sample_decision("d-1"),
                &sample_applicant(),
            ))
            .unwrap();

        match &ledger.records()[0].event {
            AuditEvent::DecisionRecorded {
                decision,
                gender,
                region,
                ..
            } => {
                assert_eq!(decision.id, "d-1");
                assert_eq!(gender, "female");
                assert_eq!(region, "north");
            }
            other => panic!("expected DecisionRecorded, got {other:?}"),
        }
    }
}
