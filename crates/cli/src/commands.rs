//! CLI commands

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use chrono::{Duration, Utc};

use trustlend_audit::{AuditEvent, DecisionLedger};
use trustlend_fairness::{DecisionFeed, FairnessMonitor, LedgerFeed};
use trustlend_pipeline::{DecisionPipeline, InMemoryHistory, InMemoryPeers};
use trustlend_policy::DecisionPolicy;

use crate::case::CaseFile;

/// Run one case file through the pipeline
pub fn decide(
    policy: DecisionPolicy,
    case_path: &Path,
    ledger_path: Option<&Path>,
) -> anyhow::Result<()> {
    let case = CaseFile::from_file(case_path)?;

    let history = InMemoryHistory::new();
    if let Some(rows) = &case.history {
        history.insert(&case.applicant.id, rows.to_baseline());
    }
    let peers = InMemoryPeers::new();
    if let Some(rows) = &case.peers {
        peers.insert(&case.applicant.id, rows.to_snapshot());
    }

    let mut pipeline = DecisionPipeline::new(policy.clone(), Arc::new(history), Arc::new(peers))?;

    let ledger = match ledger_path {
        Some(path) => {
            let mut ledger = DecisionLedger::open(path)?;
            if ledger.is_empty() {
                ledger.append(AuditEvent::policy_activated(
                    policy.version.clone(),
                    policy.fingerprint(),
                ))?;
            }
            let ledger = Arc::new(Mutex::new(ledger));
            pipeline = pipeline.with_ledger(ledger.clone());
            Some(ledger)
        }
        None => None,
    };

    let run = pipeline.decide(&case.applicant, &case.request, &case.facts)?;

    println!(
        "✅ Decision {}: {} ({})",
        run.decision.id, run.decision.verdict, run.decision.branch
    );
    println!();
    print!("{}", run.explanations.technical);
    println!();
    println!("Applicant notice:");
    for reason in &run.explanations.plain {
        println!("  - {}", reason.fallback_text());
    }

    if let Some(ledger) = ledger {
        let ledger = ledger.lock().expect("ledger lock");
        println!();
        println!(
            "Recorded on ledger ({} records, chain verified: {})",
            ledger.len(),
            if ledger.verify_chain().is_ok() {
                "yes"
            } else {
                "NO"
            }
        );
    }

    Ok(())
}

/// Verify the audit ledger's hash chain
pub fn audit(ledger_path: &Path) -> anyhow::Result<()> {
    let ledger = DecisionLedger::open(ledger_path)
        .with_context(|| format!("opening ledger {}", ledger_path.display()))?;

    match ledger.verify_chain() {
        Ok(()) => {
            println!("✅ Hash chain verified ({} records)", ledger.len());
        }
        Err(e) => {
            println!("❌ Hash chain broken: {}", e);
        }
    }

    Ok(())
}

/// One-shot fairness report over the trailing window
pub async fn fairness(
    policy: DecisionPolicy,
    ledger_path: &Path,
    window_days: i64,
) -> anyhow::Result<()> {
    let ledger = DecisionLedger::open(ledger_path)
        .with_context(|| format!("opening ledger {}", ledger_path.display()))?;
    let feed = LedgerFeed::new(Arc::new(Mutex::new(ledger)));

    let window_end = Utc::now();
    let window_start = window_end - Duration::days(window_days);
    let outcomes = feed.outcomes_between(window_start, window_end).await?;

    let monitor = FairnessMonitor::new(policy);
    let snapshot = monitor.evaluate(&outcomes, window_start, window_end);

    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if snapshot.passed() {
        println!("✅ No disparate-impact alerts over {} decisions", snapshot.sample_size);
    } else {
        println!("❌ {} disparate-impact alert(s)", snapshot.alerts.len());
    }

    Ok(())
}
