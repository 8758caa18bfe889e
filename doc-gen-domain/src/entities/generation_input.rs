// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::error::DocGenError;
use crate::value_objects::{
    BatchStatus, DocumentId, GenerationInputBatchId, GenerationInputId, GenerationInputSnapshot, HashHex, SectionId,
    TemplateVersionId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Becomes immutable on transition to VALIDATED; any further mutation is a
/// hard error (spec §3, §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInputBatch {
    pub id: GenerationInputBatchId,
    pub document_id: DocumentId,
    pub template_version_id: TemplateVersionId,
    pub version_intent: i64,
    pub status: BatchStatus,
    pub content_hash: Option<HashHex>,
    pub total_inputs: i64,
    pub is_immutable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GenerationInputBatch {
    pub fn new_pending(document_id: DocumentId, template_version_id: TemplateVersionId, version_intent: i64) -> Self {
        let now = Utc::now();
        Self {
            id: GenerationInputBatchId::new(),
            document_id,
            template_version_id,
            version_intent,
            status: BatchStatus::Pending,
            content_hash: None,
            total_inputs: 0,
            is_immutable: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The only permitted post-creation mutation (spec §4.4 step 6).
    pub fn validate(&mut self, content_hash: HashHex, total_inputs: i64) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "GenerationInputBatch",
                self.id.to_string(),
                "validate an already-immutable batch",
            ));
        }
        self.content_hash = Some(content_hash);
        self.total_inputs = total_inputs;
        self.status = BatchStatus::Validated;
        self.is_immutable = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_failed(&mut self) -> Result<(), DocGenError> {
        if self.is_immutable {
            return Err(DocGenError::immutability_violation(
                "GenerationInputBatch",
                self.id.to_string(),
                "fail an already-immutable batch",
            ));
        }
        self.status = BatchStatus::Failed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Input-hash is SHA-256 of the canonical JSON of the snapshot. Immutable
/// from creation — there is no post-create mutation path at all (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInput {
    pub id: GenerationInputId,
    pub batch_id: GenerationInputBatchId,
    pub section_id: SectionId,
    pub sequence_order: i64,
    pub snapshot: GenerationInputSnapshot,
    pub input_hash: HashHex,
}

impl GenerationInput {
    pub fn new(
        batch_id: GenerationInputBatchId,
        section_id: SectionId,
        sequence_order: i64,
        snapshot: GenerationInputSnapshot,
    ) -> Self {
        let input_hash = crate::value_objects::hashing::canonical_json_hash(&snapshot.to_canonical_value());
        Self {
            id: GenerationInputId::new(),
            batch_id,
            section_id,
            sequence_order,
            snapshot,
            input_hash,
        }
    }
}
