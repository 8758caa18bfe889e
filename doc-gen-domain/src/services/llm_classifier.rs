// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! LLM-assisted classification port (spec §4.9 stage 2), grounded on
//! `original_source/backend/app/domains/section/llm_classifier.py`: a
//! strict-JSON response contract at temperature 0. Invalid output yields no
//! classification rather than an error — the rule-based fallback handles it.

use crate::error::DocGenError;
use crate::value_objects::{Block, SectionType};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct LlmClassification {
    pub section_type: SectionType,
    pub confidence: f64,
    pub reasoning: String,
}

#[async_trait]
pub trait LlmClassifier: Send + Sync {
    /// Returns `None` when the model's response fails the strict-JSON
    /// contract (missing field, non-{STATIC,DYNAMIC} classification,
    /// non-numeric confidence) — never an error, since an unparsable LLM
    /// response is an expected, recoverable condition here.
    async fn classify(&self, block: &Block, structural_path: &str) -> Result<Option<LlmClassification>, DocGenError>;
}
