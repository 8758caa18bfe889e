// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Classification pipeline (spec §4.9): rule-based first, LLM-assisted
//! second, conservative fallback last. The engine itself holds no mutable
//! state and is thread-safe — determinism of the rule-based stage is a pure
//! function of text and structural context (spec §4.9 "Determinism").

use crate::classification::rule_based;
use crate::error::DocGenError;
use crate::value_objects::{Block, ClassificationMethod, SectionType};
use serde_json::{json, Value};

const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_JUSTIFICATION: &str = "Conservative fallback";

#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    pub section_type: SectionType,
    pub confidence: f64,
    pub method: ClassificationMethod,
    pub justification: String,
}

impl ClassificationOutcome {
    /// `prompt_config` payload persisted on the `Section` row for DYNAMIC
    /// classifications — `None` for STATIC, per spec §3.
    pub fn prompt_config(&self) -> Option<Value> {
        if self.section_type == SectionType::Dynamic {
            Some(json!({
                "classification_confidence": self.confidence,
                "classification_method": format!("{:?}", self.method).to_uppercase(),
                "justification": self.justification,
            }))
        } else {
            None
        }
    }
}

/// Runs the rule-based stage and returns its result if confident. The
/// LLM-assisted stage and conservative fallback are orchestrated by the
/// caller (the infrastructure-layer classification service), since the LLM
/// collaborator is async and this crate's classification logic is sync by
/// design (spec §9 "Async/coroutines": CPU-bound/pure logic stays
/// synchronous, I/O-bound collaborators are the infrastructure layer's job).
pub fn classify_rule_based(block: &Block, confidence_threshold: f64) -> Option<ClassificationOutcome> {
    rule_based::classify(block, confidence_threshold).map(|r| ClassificationOutcome {
        section_type: r.section_type,
        confidence: r.confidence,
        method: ClassificationMethod::RuleBased,
        justification: r.justification,
    })
}

/// Conservative fallback: STATIC, confidence 0.5, method FALLBACK (spec
/// §4.9 stage 3). Infallible — always returns a result.
pub fn fallback() -> ClassificationOutcome {
    ClassificationOutcome {
        section_type: SectionType::Static,
        confidence: FALLBACK_CONFIDENCE,
        method: ClassificationMethod::Fallback,
        justification: FALLBACK_JUSTIFICATION.to_string(),
    }
}

/// Validates an LLM classifier's raw response fields against the strict
/// contract (spec §4.9 stage 2): classification case-insensitively in
/// {STATIC, DYNAMIC}, confidence numeric in `[0, 1]`. Returns `None` on any
/// violation rather than propagating an error — an unparsable LLM response
/// is expected, not exceptional.
pub fn validate_llm_response(classification: &str, confidence: f64) -> Result<SectionType, DocGenError> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(DocGenError::internal("LLM confidence out of range"));
    }
    match classification.to_uppercase().as_str() {
        "STATIC" => Ok(SectionType::Static),
        "DYNAMIC" => Ok(SectionType::Dynamic),
        other => Err(DocGenError::internal(format!("unrecognized LLM classification: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::TextRun;

    #[test]
    fn fallback_is_static_with_fixed_confidence() {
        let outcome = fallback();
        assert_eq!(outcome.section_type, SectionType::Static);
        assert_eq!(outcome.confidence, 0.5);
        assert_eq!(outcome.method, ClassificationMethod::Fallback);
    }

    #[test]
    fn static_outcome_has_no_prompt_config() {
        let outcome = fallback();
        assert!(outcome.prompt_config().is_none());
    }

    #[test]
    fn dynamic_outcome_has_prompt_config_with_required_fields() {
        let block = Block::Paragraph {
            block_id: "b1".into(),
            sequence: 0,
            runs: vec![TextRun::plain("Dear {client_name}, welcome.")],
            formatting: crate::value_objects::ParagraphFormatting {
                alignment: None,
                indent_left: None,
                indent_right: None,
                space_before: None,
                space_after: None,
                style_name: None,
            },
        };
        let outcome = classify_rule_based(&block, 0.85).unwrap();
        assert_eq!(outcome.section_type, SectionType::Dynamic);
        let config = outcome.prompt_config().unwrap();
        assert!(config.get("classification_confidence").is_some());
        assert!(config.get("classification_method").is_some());
        assert!(config.get("justification").is_some());
    }

    #[test]
    fn llm_response_case_insensitive() {
        assert_eq!(validate_llm_response("dynamic", 0.9).unwrap(), SectionType::Dynamic);
        assert_eq!(validate_llm_response("STATIC", 0.9).unwrap(), SectionType::Static);
        assert!(validate_llm_response("unsure", 0.9).is_err());
        assert!(validate_llm_response("STATIC", 1.5).is_err());
    }
}
