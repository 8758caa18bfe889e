// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Conservative default `LlmClient`/`LlmClassifier` implementations,
//! grounded on
//! `original_source/backend/app/domains/generation/llm_client.py`'s
//! `MockLLMClient` and `llm_classifier.py`'s strict-JSON contract. Used by
//! tests and local runs that have no LLM credential configured (spec §4.5,
//! §4.9).

use async_trait::async_trait;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::services::{LlmClassification, LlmClassifier, LlmClient};
use doc_gen_domain::value_objects::{Block, GenerationInputSnapshot, SectionType};

/// Deterministically echoes back a templated paragraph referencing the
/// section's client name and hierarchy context — enough structure for
/// content-constraint checks (min length, complete sentence) to pass, and
/// fully reproducible given the same snapshot (spec §4.4 "Determinism"
/// extends naturally to replay through this client).
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_section(&self, snapshot: &GenerationInputSnapshot) -> Result<String, DocGenError> {
        let heading = snapshot
            .hierarchy_context
            .parent_heading
            .clone()
            .unwrap_or_else(|| "this section".to_string());
        Ok(format!(
            "For {}, regarding {}, the following content has been prepared based on the provided details.",
            snapshot.client_data.client_name, heading
        ))
    }
}

/// Always declines to classify, forcing the rule-based engine's conservative
/// fallback (spec §4.9 stage 3) — the pipeline is fully testable without a
/// real LLM credential.
pub struct NoopLlmClassifier;

#[async_trait]
impl LlmClassifier for NoopLlmClassifier {
    async fn classify(&self, _block: &Block, _structural_path: &str) -> Result<Option<LlmClassification>, DocGenError> {
        Ok(None)
    }
}

#[allow(dead_code)]
fn _section_type_is_exhaustive(_s: SectionType) {}
