pub mod engine;
pub mod rule_based;

pub use engine::{classify_rule_based, fallback, validate_llm_response, ClassificationOutcome};
pub use rule_based::RuleClassification;
