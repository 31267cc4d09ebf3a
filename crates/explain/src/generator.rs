//! Rendering of decisions for compliance and applicant audiences

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use trustlend_core::ReasonCode;
use trustlend_ensemble::{Decision, Verdict};
use trustlend_policy::DecisionPolicy;

/// One applicant-facing reason: a localization key plus its parameters.
///
/// The key and params cross the localization boundary; `fallback_text` is
/// the untranslated English rendering for callers without a translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainReason {
    pub key: String,
    pub params: BTreeMap<String, String>,
}

impl PlainReason {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: BTreeMap::new(),
        }
    }

    fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// English fallback for the key, with parameters interpolated
    pub fn fallback_text(&self) -> String {
        let text = match self.key.as_str() {
            "verdict.approved" => "Your loan application has been approved.",
            "verdict.rejected" => "Your loan application could not be approved.",
            "verdict.manual_review" => {
                "Your application needs additional verification. A loan officer will review it."
            }
            "reason.account_too_new" => "Your account is too new to apply for this loan.",
            "reason.amount_over_income_cap" => {
                "The requested amount is too large relative to your monthly income."
            }
            "reason.application_burst" => {
                "You have submitted several applications in a short period."
            }
            "reason.unemployed_large_request" => {
                "Large requests require a verifiable income source."
            }
            "reason.fraud_ring_detected" => {
                "This application could not be approved after a network review."
            }
            "reason.all_checks_passed" => "All eligibility checks passed.",
            "reason.score_below_floor" | "reason.score_below_threshold" => {
                "Your eligibility score is below the required level."
            }
            "reason.trust_below_floor" | "reason.trust_below_threshold" => {
                "We could not establish enough supporting history for this request."
            }
            "reason.anomaly_above_threshold" => {
                "This request differs significantly from your usual activity."
            }
            "reason.insufficient_information" => {
                "Your application needs additional verification."
            }
            _ => "Your application has been processed.",
        };
        text.to_string()
    }
}

/// Both renderings of one decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanations {
    /// Full component breakdown for compliance
    pub technical: String,
    /// Keyed, localizable reasons for the applicant
    pub plain: Vec<PlainReason>,
}

/// Presentation-only mapper from a Decision to its two renderings.
pub struct ExplanationGenerator {
    policy: DecisionPolicy,
}

impl ExplanationGenerator {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Produce both renderings at once
    pub fn render(&self, decision: &Decision) -> Explanations {
        Explanations {
            technical: self.technical(decision),
            plain: self.plain(decision),
        }
    }

    /// Compliance rendering: every component, threshold, and z-score the
    /// decision was based on.
    pub fn technical(&self, decision: &Decision) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "decision {}", decision.id);
        let _ = writeln!(
            out,
            "  applicant={} verdict={} branch={} policy={}",
            decision.applicant_id, decision.verdict, decision.branch, decision.policy_version
        );
        let _ = writeln!(
            out,
            "  reasons: {}",
            decision
                .reasons
                .iter()
                .map(|r| r.code())
                .collect::<Vec<_>>()
                .join(", ")
        );

        if let Some(report) = &decision.rule_report {
            let _ = writeln!(out, "  rules evaluated:");
            for eval in &report.evaluations {
                let _ = writeln!(out, "    {} -> {:?}", eval.rule, eval.outcome);
            }
        }

        if let Some(score) = &decision.score {
            let _ = writeln!(
                out,
                "  score: {}/100 (threshold {}, floor {}, table {})",
                score.score,
                self.policy.score_threshold,
                self.policy.reject_score_floor,
                score.table_version
            );
            for component in &score.components {
                let _ = writeln!(out, "    {:+} {}", component.points, component.factor);
            }
        }

        if let Some(trust) = &decision.trust {
            let _ = writeln!(
                out,
                "  trust: {:.4} (threshold {}, floor {})",
                trust.trust_score, self.policy.trust_threshold, self.policy.reject_trust_floor
            );
            let _ = writeln!(
                out,
                "    reputation={:.4} diversity={:.4} depth={:.4}",
                trust.peer_reputation, trust.network_diversity, trust.interaction_depth
            );
            if trust.fraud_ring_detected {
                let _ = writeln!(
                    out,
                    "    fraud ring: probability={:.4} cluster={} members={}",
                    trust.fraud_ring_probability,
                    trust.cluster_id.as_deref().unwrap_or("-"),
                    trust.ring_members.join(",")
                );
            }
        }

        if let Some(anomaly) = &decision.anomaly {
            let _ = writeln!(
                out,
                "  anomaly: {:.4} (threshold {}{})",
                anomaly.anomaly_score,
                self.policy.anomaly_threshold,
                if anomaly.insufficient_history {
                    ", insufficient history"
                } else {
                    ""
                }
            );
            for signal in &anomaly.signals {
                let _ = writeln!(out, "    {} z={:.2}", signal.kind, signal.z_score);
            }
        }

        out
    }

    /// Applicant rendering: verdict headline plus one keyed bullet per
    /// reason, with the values that matter as parameters.
    pub fn plain(&self, decision: &Decision) -> Vec<PlainReason> {
        let headline_key = match decision.verdict {
            Verdict::Approved => "verdict.approved",
            Verdict::Rejected => "verdict.rejected",
            Verdict::ManualReview => "verdict.manual_review",
        };
        let mut reasons = vec![PlainReason::new(headline_key)];

        for reason in &decision.reasons {
            let key = format!("reason.{}", reason.code().to_lowercase());
            let mut plain = PlainReason::new(key);

            plain = match reason {
                ReasonCode::ScoreBelowFloor | ReasonCode::ScoreBelowThreshold => {
                    match &decision.score {
                        Some(s) => plain.with("score", s.score),
                        None => plain,
                    }
                }
                ReasonCode::AmountOverIncomeCap => {
                    plain.with("income_multiple_cap", self.policy.income_multiple_cap)
                }
                ReasonCode::AccountTooNew => {
                    plain.with("min_account_age_days", self.policy.min_account_age_days)
                }
                _ => plain,
            };
            reasons.push(plain);
        }

        reasons
    }
}
