// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::error::DocGenError;
use crate::value_objects::{
    GenerationInputBatchId, HashHex, SectionId, SectionOutputBatchId, SectionOutputId, SectionOutputStatus,
};
use serde::{Deserialize, Serialize};

/// Becomes immutable and validated atomically; only validated outputs are
/// consumable by assembly (spec §3, §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOutput {
    pub id: SectionOutputId,
    pub output_batch_id: SectionOutputBatchId,
    pub input_batch_id: GenerationInputBatchId,
    pub section_id: SectionId,
    pub status: SectionOutputStatus,
    pub generated_content: Option<String>,
    pub content_hash: Option<HashHex>,
    pub is_validated: bool,
    pub is_immutable: bool,
}

impl SectionOutput {
    pub fn new_pending(
        output_batch_id: SectionOutputBatchId,
        input_batch_id: GenerationInputBatchId,
        section_id: SectionId,
    ) -> Self {
        Self {
            id: SectionOutputId::new(),
            output_batch_id,
            input_batch_id,
            section_id,
            status: SectionOutputStatus::Pending,
            generated_content: None,
            content_hash: None,
            is_validated: false,
            is_immutable: false,
        }
    }

    /// Atomic transition to VALIDATED & immutable (spec §4.5). `content`
    /// must already have passed content-constraint checks by the caller.
    pub fn validate(&mut self, content: String) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "SectionOutput",
                self.id.to_string(),
                "validate an already-immutable output",
            ));
        }
        let content_hash = crate::value_objects::hashing::text_hash(&content);
        self.generated_content = Some(content);
        self.content_hash = Some(content_hash);
        self.status = SectionOutputStatus::Validated;
        self.is_validated = true;
        self.is_immutable = true;
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "SectionOutput",
                self.id.to_string(),
                "fail an already-immutable output",
            ));
        }
        self.status = SectionOutputStatus::Failed;
        Ok(())
    }
}

/// Not a table named in spec §3's entity list directly, but `output_batch_id`
/// is referenced by `SectionOutput` and `AssembledDocument`: this groups a
/// generation run's outputs so assembly can ask "are all dynamic sections
/// covered" and "did any output fail" in one place, mirroring the Python
/// original's `SectionOutputBatch` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOutputBatch {
    pub id: SectionOutputBatchId,
    pub input_batch_id: GenerationInputBatchId,
    pub total_outputs: i64,
    pub failed_count: i64,
}

impl SectionOutputBatch {
    pub fn new(input_batch_id: GenerationInputBatchId, total_outputs: i64) -> Self {
        Self {
            id: SectionOutputBatchId::new(),
            input_batch_id,
            total_outputs,
            failed_count: 0,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }
}
