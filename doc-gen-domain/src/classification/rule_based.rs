// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Rule-based classification, grounded verbatim on
//! `original_source/backend/app/domains/section/rule_based_classifier.py`:
//! the same pattern set, confidence weights, and ordering (static patterns
//! → dynamic patterns → structural indicators → content heuristics).

use crate::value_objects::{Block, SectionType};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct RuleClassification {
    pub section_type: SectionType,
    pub confidence: f64,
    pub justification: String,
}

struct Pattern {
    regex: Regex,
    confidence: f64,
    reason: &'static str,
}

macro_rules! pattern {
    ($src:expr, $confidence:expr, $reason:expr) => {
        Pattern {
            regex: Regex::new($src).unwrap(),
            confidence: $confidence,
            reason: $reason,
        }
    };
}

static STATIC_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| vec![
    pattern!(
        r"(?i)\b(disclaimer|confidential|privileged|copyright|all rights reserved)\b",
        0.95,
        "Legal disclaimer or confidentiality notice"
    ),
    pattern!(
        r"(?i)\b(this document|prepared by|professional advice|should not be construed)\b",
        0.92,
        "Standard boilerplate text"
    ),
    pattern!(
        r"(?i)^(page \d+|proprietary|internal use only)",
        0.95,
        "Fixed header or footer content"
    ),
    pattern!(
        r"(?i)\b(tel:|email:|address:|phone:|fax:)",
        0.90,
        "Fixed contact information"
    ),
]);

static DYNAMIC_PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| vec![
    pattern!(
        r"\{[^}]+\}|\[[^\]]+\]|<[^>]+>|\$\{[^}]+\}",
        0.95,
        "Contains placeholder syntax"
    ),
    pattern!(
        r"(?i)\b(to be completed|insert|customize|client-specific|personalized)\b",
        0.92,
        "Explicit customization marker"
    ),
    pattern!(
        r"(?i)\b(client name|company name|project name|date|amount|percentage)\b",
        0.88,
        "Contains variable references"
    ),
    pattern!(
        r"(?i)\b(our analysis|we recommend|specific to|tailored|customized approach)\b",
        0.85,
        "Client-specific narrative content"
    ),
]);

fn extract_text(block: &Block) -> String {
    match block {
        Block::Paragraph { runs, .. } | Block::Heading { runs, .. } | Block::Header { runs, .. } | Block::Footer { runs, .. } => {
            runs.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().concat()
        }
        _ => String::new(),
    }
}

fn check_structural_indicators(block: &Block) -> Option<RuleClassification> {
    match block {
        Block::Header { .. } | Block::Footer { .. } => Some(RuleClassification {
            section_type: SectionType::Static,
            confidence: 0.95,
            justification: "Rule-based: Header or footer block type".to_string(),
        }),
        Block::Heading { formatting, .. } if formatting.level == 1 => Some(RuleClassification {
            section_type: SectionType::Static,
            confidence: 0.70,
            justification: "Rule-based: Top-level heading typically structural".to_string(),
        }),
        _ => None,
    }
}

fn apply_heuristics(block: &Block, text: &str) -> Option<RuleClassification> {
    let trimmed = text.trim();
    if trimmed.len() < 10 {
        return Some(RuleClassification {
            section_type: SectionType::Static,
            confidence: 0.75,
            justification: "Rule-based: Very short content, likely structural label".to_string(),
        });
    }
    if text.len() < 50 && !text.is_empty() && text.chars().all(|c| !c.is_lowercase()) {
        return Some(RuleClassification {
            section_type: SectionType::Static,
            confidence: 0.80,
            justification: "Rule-based: ALL CAPS short text, likely static header".to_string(),
        });
    }
    if matches!(block, Block::Paragraph { .. }) && text.len() > 200 {
        let word_count = text.split_whitespace().count();
        if word_count > 50 {
            return Some(RuleClassification {
                section_type: SectionType::Dynamic,
                confidence: 0.72,
                justification: "Rule-based: Long narrative paragraph, likely client-specific content".to_string(),
            });
        }
    }
    None
}

/// Returns `None` when no rule produced a result at all (distinct from a
/// low-confidence result — the engine decides what to do with confidence
/// against the threshold).
pub fn classify(block: &Block, confidence_threshold: f64) -> Option<RuleClassification> {
    let text = extract_text(block);

    for p in STATIC_PATTERNS.iter() {
        if p.regex.is_match(&text) {
            return Some(RuleClassification {
                section_type: SectionType::Static,
                confidence: p.confidence,
                justification: format!("Rule-based: {}", p.reason),
            });
        }
    }
    for p in DYNAMIC_PATTERNS.iter() {
        if p.regex.is_match(&text) {
            return Some(RuleClassification {
                section_type: SectionType::Dynamic,
                confidence: p.confidence,
                justification: format!("Rule-based: {}", p.reason),
            });
        }
    }
    if let Some(result) = check_structural_indicators(block) {
        if result.confidence >= confidence_threshold {
            return Some(result);
        }
    }
    if let Some(result) = apply_heuristics(block, &text) {
        if result.confidence >= confidence_threshold {
            return Some(result);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{HeadingFormatting, TextRun};

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            block_id: "b1".into(),
            sequence: 0,
            runs: vec![TextRun::plain(text)],
            formatting: crate::value_objects::ParagraphFormatting {
                alignment: None,
                indent_left: None,
                indent_right: None,
                space_before: None,
                space_after: None,
                style_name: None,
            },
        }
    }

    #[test]
    fn disclaimer_text_is_static() {
        let block = paragraph("This is confidential and privileged material.");
        let result = classify(&block, 0.85).unwrap();
        assert_eq!(result.section_type, SectionType::Static);
        assert!(result.confidence >= 0.9);
    }

    #[test]
    fn placeholder_syntax_is_dynamic() {
        let block = paragraph("Dear {client_name}, thank you.");
        let result = classify(&block, 0.85).unwrap();
        assert_eq!(result.section_type, SectionType::Dynamic);
    }

    #[test]
    fn top_level_heading_is_static_structural() {
        let block = Block::Heading {
            block_id: "h1".into(),
            sequence: 0,
            runs: vec![TextRun::plain("Introduction")],
            formatting: HeadingFormatting {
                level: 1,
                alignment: None,
                style_name: None,
            },
        };
        let result = classify(&block, 0.5).unwrap();
        assert_eq!(result.section_type, SectionType::Static);
    }

    #[test]
    fn very_short_text_is_static_fallback_heuristic() {
        let block = paragraph("N/A");
        let result = classify(&block, 0.5).unwrap();
        assert_eq!(result.section_type, SectionType::Static);
    }

    #[test]
    fn ambiguous_medium_text_yields_no_confident_result() {
        let block = paragraph("Section overview follows below for reference purposes only today.");
        let result = classify(&block, 0.85);
        assert!(result.is_none());
    }
}
