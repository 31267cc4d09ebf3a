//! End-to-end pipeline runs over in-memory stores and the audit ledger

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use trustlend_anomaly::HistoricalBaseline;
use trustlend_audit::{AuditEvent, DecisionLedger};
use trustlend_core::{
    AccountFacts, Amount, Applicant, ApplicantId, EmploymentCategory, LoanRequest, ReasonCode,
};
use trustlend_ensemble::{DecisionBranch, Verdict};
use trustlend_pipeline::{
    DecisionPipeline, HistoricalSource, InMemoryHistory, InMemoryPeers, SourceError,
};
use trustlend_policy::DecisionPolicy;
use trustlend_trust::{PeerGraphSnapshot, PeerNode};

fn applicant(id: &str) -> Applicant {
    Applicant {
        id: ApplicantId::new(id),
        age: 30,
        monthly_income: Amount::new(dec!(25000)).unwrap(),
        employment: EmploymentCategory::Salaried,
        has_bank_account: true,
        region: "north".to_string(),
        gender: "female".to_string(),
    }
}

fn request(id: &str, amount: rust_decimal::Decimal) -> LoanRequest {
    LoanRequest {
        applicant_id: ApplicantId::new(id),
        amount: Amount::new(amount).unwrap(),
        purpose: "inventory".to_string(),
        submitted_at: Utc::now(),
    }
}

fn seasoned_facts() -> AccountFacts {
    AccountFacts {
        account_age_days: 400,
        applications_in_window: 0,
    }
}

fn quiet_peer(handle: &str) -> PeerNode {
    PeerNode {
        handle: handle.to_string(),
        defaulted: false,
        interaction_count: 10,
        relationship_age_days: 300,
        last_application_at: None,
    }
}

/// 12 healthy peers, no synchronized applications
fn healthy_neighborhood() -> PeerGraphSnapshot {
    let peers: Vec<PeerNode> = (0..12).map(|i| quiet_peer(&format!("peer-{i}"))).collect();
    PeerGraphSnapshot::new(peers, vec![(0, 1), (2, 3)])
}

/// 5-clique that all applied within the last hour, 3 defaulted
fn ring_neighborhood(now: chrono::DateTime<Utc>) -> PeerGraphSnapshot {
    let peers: Vec<PeerNode> = (0..5)
        .map(|i| PeerNode {
            handle: format!("ring-{i}"),
            defaulted: i < 3,
            interaction_count: 2,
            relationship_age_days: 20,
            last_application_at: Some(now - Duration::minutes(30 + i as i64)),
        })
        .collect();
    let mut edges = Vec::new();
    for a in 0..5 {
        for b in (a + 1)..5 {
            edges.push((a, b));
        }
    }
    PeerGraphSnapshot::new(peers, edges)
}

struct FailingHistory;

impl HistoricalSource for FailingHistory {
    fn baseline(&self, _: &ApplicantId) -> Result<Option<HistoricalBaseline>, SourceError> {
        Err(SourceError::Timeout("historical store".to_string()))
    }
}

#[test]
fn test_good_applicant_with_healthy_network_is_approved() {
    let peers = InMemoryPeers::new();
    let a = applicant("APP-001");
    peers.insert(&a.id, healthy_neighborhood());

    let ledger = Arc::new(Mutex::new(DecisionLedger::in_memory()));
    let pipeline = DecisionPipeline::new(
        DecisionPolicy::default(),
        Arc::new(InMemoryHistory::new()),
        Arc::new(peers),
    )
    .unwrap()
    .with_ledger(ledger.clone());

    let run = pipeline
        .decide(&a, &request("APP-001", dec!(5000)), &seasoned_facts())
        .unwrap();

    assert_eq!(run.decision.verdict, Verdict::Approved);
    assert_eq!(run.decision.branch, DecisionBranch::AllClear);
    assert_eq!(run.decision.score.as_ref().unwrap().score, 90);
    // No history: anomaly reports a neutral cold start
    assert!(run.decision.anomaly.as_ref().unwrap().insufficient_history);
    assert_eq!(run.explanations.plain[0].key, "verdict.approved");

    // The run landed on the ledger and the chain holds
    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.len(), 1);
    ledger.verify_chain().unwrap();
}

#[test]
fn test_fraud_ring_overrides_a_perfect_profile() {
    let now = Utc::now();
    let peers = InMemoryPeers::new();
    let a = applicant("APP-002");
    peers.insert(&a.id, ring_neighborhood(now));

    let pipeline = DecisionPipeline::new(
        DecisionPolicy::default(),
        Arc::new(InMemoryHistory::new()),
        Arc::new(peers),
    )
    .unwrap();

    let run = pipeline
        .decide(&a, &request("APP-002", dec!(5000)), &seasoned_facts())
        .unwrap();

    assert_eq!(run.decision.verdict, Verdict::Rejected);
    assert_eq!(run.decision.branch, DecisionBranch::FraudRingOverride);
    assert_eq!(run.decision.reasons[0], ReasonCode::FraudRingDetected);

    let trust = run.decision.trust.as_ref().unwrap();
    assert!(trust.fraud_ring_detected);
    assert_eq!(trust.ring_members.len(), 5);
    assert!(trust.cluster_id.is_some());
}

#[test]
fn test_source_failure_fails_closed_and_is_still_recorded() {
    let ledger = Arc::new(Mutex::new(DecisionLedger::in_memory()));
    let a = applicant("APP-003");

    let pipeline = DecisionPipeline::new(
        DecisionPolicy::default(),
        Arc::new(FailingHistory),
        Arc::new(InMemoryPeers::new()),
    )
    .unwrap()
    .with_ledger(ledger.clone());

    let run = pipeline
        .decide(&a, &request("APP-003", dec!(5000)), &seasoned_facts())
        .unwrap();

    assert_eq!(run.decision.verdict, Verdict::ManualReview);
    assert_eq!(run.decision.branch, DecisionBranch::FailClosed);
    assert!(run
        .decision
        .reasons
        .contains(&ReasonCode::InsufficientInformation));
    assert!(run.decision.score.is_none());

    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.len(), 1);
    ledger.verify_chain().unwrap();
}

#[test]
fn test_anomalous_amount_blocks_automatic_approval() {
    let a = applicant("APP-004");

    let history = InMemoryHistory::new();
    let now = Utc::now();
    // Steady history: ~5000 per request, monthly cadence, same region
    history.insert(
        &a.id,
        HistoricalBaseline::from_history(
            &[dec!(5000), dec!(5200), dec!(4800), dec!(5000)],
            &[
                now - Duration::days(120),
                now - Duration::days(90),
                now - Duration::days(60),
                now - Duration::days(30),
            ],
            &[12, 12, 12, 12],
            &["north".to_string()],
        ),
    );

    let peers = InMemoryPeers::new();
    peers.insert(&a.id, healthy_neighborhood());

    let pipeline = DecisionPipeline::new(
        DecisionPolicy::default(),
        Arc::new(history),
        Arc::new(peers),
    )
    .unwrap();

    // 50x the usual request amount
    let run = pipeline
        .decide(&a, &request("APP-004", dec!(250000)), &seasoned_facts())
        .unwrap();

    assert_eq!(run.decision.verdict, Verdict::ManualReview);
    assert_eq!(run.decision.branch, DecisionBranch::ManualReview);
    let anomaly = run.decision.anomaly.as_ref().unwrap();
    assert!(anomaly.anomaly_score >= 0.7);
    assert!(!anomaly.insufficient_history);
}

#[test]
fn test_ledger_accumulates_decisions_and_overrides_in_order() {
    let ledger = Arc::new(Mutex::new(DecisionLedger::in_memory()));
    let peers = InMemoryPeers::new();
    let a = applicant("APP-005");
    peers.insert(&a.id, healthy_neighborhood());

    let policy = DecisionPolicy::default();
    {
        let mut ledger = ledger.lock().unwrap();
        ledger
            .append(AuditEvent::policy_activated(
                policy.version.clone(),
                policy.fingerprint(),
            ))
            .unwrap();
    }

    let pipeline = DecisionPipeline::new(policy, Arc::new(InMemoryHistory::new()), Arc::new(peers))
        .unwrap()
        .with_ledger(ledger.clone());

    let run = pipeline
        .decide(&a, &request("APP-005", dec!(5000)), &seasoned_facts())
        .unwrap();

    {
        let mut ledger = ledger.lock().unwrap();
        ledger
            .append(AuditEvent::officer_override(
                run.decision.id.clone(),
                Verdict::Rejected,
                "officer-7",
                "income documents failed verification",
            ))
            .unwrap();
    }

    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.len(), 3);
    ledger.verify_chain().unwrap();
    assert_eq!(ledger.records()[0].event.kind(), "policy_activated");
    assert_eq!(ledger.records()[1].event.kind(), "decision_recorded");
    assert_eq!(ledger.records()[2].event.kind(), "officer_override");
}
