//! Scoring strategy - an explicit, passed-in variant instead of a global
//! model registry. The pipeline stays a pure function of its inputs plus
//! this value.

use serde::{Deserialize, Serialize};

/// Which scoring implementation the pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Deterministic versioned lookup table (the only shipped strategy)
    #[default]
    RuleBased,

    /// Placeholder for a future trained-model backend. Carries the model
    /// reference so activation is auditable; selecting it today is a
    /// validation error.
    ModelBased { model_ref: String },
}

impl ScoringStrategy {
    pub fn is_rule_based(&self) -> bool {
        matches!(self, ScoringStrategy::RuleBased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_rule_based() {
        assert!(ScoringStrategy::default().is_rule_based());
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_string(&ScoringStrategy::RuleBased).unwrap();
        assert!(json.contains("rule_based"));

        let model = ScoringStrategy::ModelBased {
            model_ref: "gbm-2024-q3".to_string(),
        };
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("model_based"));
        assert!(json.contains("gbm-2024-q3"));
    }
}
