// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::error::DocGenError;
use crate::value_objects::{
    AssembledDocumentId, AssemblyStatus, DocumentId, HashHex, SectionOutputBatchId, TemplateVersionId,
};
use serde::{Deserialize, Serialize};

/// Per-block outcome of the assembly pass, grounded on
/// `original_source/backend/app/domains/assembly/service.py`'s
/// `ContentInjector` result records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionResult {
    pub block_id: String,
    pub was_injected: bool,
    pub was_modified: bool,
    pub is_dynamic: bool,
    pub original_hash: HashHex,
    pub assembled_hash: HashHex,
    pub reason: Option<String>,
}

/// One per `section_output_batch_id` unless `force_reassembly` (spec §3).
/// `assembly_hash` covers ordered `(block_id, assembled_content_hash)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledDocument {
    pub id: AssembledDocumentId,
    pub document_id: DocumentId,
    pub template_version_id: TemplateVersionId,
    pub version_intent: i64,
    pub section_output_batch_id: SectionOutputBatchId,
    pub status: AssemblyStatus,
    pub assembly_hash: Option<HashHex>,
    pub original_block_count: i64,
    pub assembled_block_count: i64,
    pub injection_results: Vec<InjectionResult>,
    pub is_immutable: bool,
}

impl AssembledDocument {
    pub fn new_pending(
        document_id: DocumentId,
        template_version_id: TemplateVersionId,
        version_intent: i64,
        section_output_batch_id: SectionOutputBatchId,
    ) -> Self {
        Self {
            id: AssembledDocumentId::new(),
            document_id,
            template_version_id,
            version_intent,
            section_output_batch_id,
            status: AssemblyStatus::Pending,
            assembly_hash: None,
            original_block_count: 0,
            assembled_block_count: 0,
            injection_results: Vec::new(),
            is_immutable: false,
        }
    }

    pub fn mark_in_progress(&mut self) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "AssembledDocument",
                self.id.to_string(),
                "restart an already-immutable assembly",
            ));
        }
        self.status = AssemblyStatus::InProgress;
        Ok(())
    }

    /// COMPLETED → VALIDATED, and marks the row immutable (spec §4.6).
    pub fn validate(
        &mut self,
        assembly_hash: HashHex,
        original_block_count: i64,
        assembled_block_count: i64,
        injection_results: Vec<InjectionResult>,
    ) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "AssembledDocument",
                self.id.to_string(),
                "validate an already-immutable assembly",
            ));
        }
        self.assembly_hash = Some(assembly_hash);
        self.original_block_count = original_block_count;
        self.assembled_block_count = assembled_block_count;
        self.injection_results = injection_results;
        self.status = AssemblyStatus::Validated;
        self.is_immutable = true;
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "AssembledDocument",
                self.id.to_string(),
                "fail an already-immutable assembly",
            ));
        }
        self.status = AssemblyStatus::Failed;
        Ok(())
    }
}
