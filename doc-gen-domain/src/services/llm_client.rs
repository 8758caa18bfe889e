// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Section-generation LLM client port, grounded on
//! `original_source/backend/app/domains/generation/llm_client.py`.

use crate::error::DocGenError;
use crate::value_objects::GenerationInputSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_section(&self, snapshot: &GenerationInputSnapshot) -> Result<String, DocGenError>;
}
