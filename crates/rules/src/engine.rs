//! Rule engine - ordered predicate evaluation with short-circuit on reject

use trustlend_core::{AccountFacts, Applicant, EmploymentCategory, LoanRequest, ReasonCode};
use trustlend_policy::DecisionPolicy;

use crate::outcome::{RuleEvaluation, RuleOutcome, RuleReport};

type RulePredicate =
    fn(&DecisionPolicy, &Applicant, &LoanRequest, &AccountFacts) -> RuleOutcome;

/// A named deterministic rule
struct Rule {
    name: &'static str,
    check: RulePredicate,
}

/// The ordered built-in rule set. Order matters: the first REJECT wins.
const RULES: &[Rule] = &[
    Rule {
        name: "ACCOUNT_TOO_NEW",
        check: account_too_new,
    },
    Rule {
        name: "AMOUNT_OVER_INCOME_CAP",
        check: amount_over_income_cap,
    },
    Rule {
        name: "APPLICATION_BURST",
        check: application_burst,
    },
    Rule {
        name: "UNEMPLOYED_LARGE_REQUEST",
        check: unemployed_large_request,
    },
];

/// Names of every rule in evaluation order (for audit enumeration)
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|r| r.name).collect()
}

fn account_too_new(
    policy: &DecisionPolicy,
    _applicant: &Applicant,
    _request: &LoanRequest,
    facts: &AccountFacts,
) -> RuleOutcome {
    if facts.account_age_days < policy.min_account_age_days {
        RuleOutcome::Reject {
            reason: ReasonCode::AccountTooNew,
        }
    } else {
        RuleOutcome::Pass
    }
}

fn amount_over_income_cap(
    policy: &DecisionPolicy,
    applicant: &Applicant,
    request: &LoanRequest,
    _facts: &AccountFacts,
) -> RuleOutcome {
    // Zero income caps at zero, so any positive request rejects.
    let cap = applicant
        .monthly_income
        .checked_mul_u32(policy.income_multiple_cap);
    match cap {
        Some(cap) if request.amount <= cap => RuleOutcome::Pass,
        _ => RuleOutcome::Reject {
            reason: ReasonCode::AmountOverIncomeCap,
        },
    }
}

fn application_burst(
    policy: &DecisionPolicy,
    _applicant: &Applicant,
    _request: &LoanRequest,
    facts: &AccountFacts,
) -> RuleOutcome {
    // The current application counts toward the burst.
    if facts.applications_in_window.saturating_add(1) >= policy.burst_application_count {
        RuleOutcome::Flag {
            reason: ReasonCode::ApplicationBurst,
        }
    } else {
        RuleOutcome::Pass
    }
}

fn unemployed_large_request(
    policy: &DecisionPolicy,
    applicant: &Applicant,
    request: &LoanRequest,
    _facts: &AccountFacts,
) -> RuleOutcome {
    if applicant.employment == EmploymentCategory::Unemployed
        && request.amount.value() >= policy.large_request_threshold
    {
        RuleOutcome::Flag {
            reason: ReasonCode::UnemployedLargeRequest,
        }
    } else {
        RuleOutcome::Pass
    }
}

/// Layer 1 gatekeeper. Holds only the policy; evaluation is a pure
/// function of its arguments.
pub struct RuleEngine {
    policy: DecisionPolicy,
}

impl RuleEngine {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Evaluate the ordered rule set.
    ///
    /// Stops at the first REJECT; everything evaluated up to that point is
    /// recorded in the report.
    pub fn evaluate(
        &self,
        applicant: &Applicant,
        request: &LoanRequest,
        facts: &AccountFacts,
    ) -> RuleReport {
        let mut evaluations = Vec::with_capacity(RULES.len());
        let mut rejected = None;
        let mut flags = Vec::new();

        for rule in RULES {
            let outcome = (rule.check)(&self.policy, applicant, request, facts);
            evaluations.push(RuleEvaluation {
                rule: rule.name.to_string(),
                outcome,
            });

            match outcome {
                RuleOutcome::Reject { reason } => {
                    tracing::info!(rule = rule.name, %reason, "hard reject");
                    rejected = Some(reason);
                    break;
                }
                RuleOutcome::Flag { reason } => {
                    tracing::debug!(rule = rule.name, %reason, "flag raised");
                    flags.push(reason);
                }
                RuleOutcome::Pass => {}
            }
        }

        RuleReport {
            evaluations,
            rejected,
            flags,
        }
    }
}
