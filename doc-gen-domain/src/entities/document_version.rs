// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::{DocumentId, DocumentVersionId, HashHex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generation metadata persisted alongside a `DocumentVersion` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub content_hash: HashHex,
    pub file_size_bytes: i64,
}

/// Uniqueness: `(document_id, version_number)`. Content deduplication:
/// `(document_id, content_hash)` resolves to the existing version (spec §3).
/// Immutable from creation — there is no mutation path on this entity at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: DocumentVersionId,
    pub document_id: DocumentId,
    pub version_number: i64,
    pub output_path: String,
    pub generation_metadata: GenerationMetadata,
    pub created_at: DateTime<Utc>,
}

impl DocumentVersion {
    pub fn new(
        document_id: DocumentId,
        version_number: i64,
        output_path: impl Into<String>,
        generation_metadata: GenerationMetadata,
    ) -> Self {
        Self {
            id: DocumentVersionId::new(),
            document_id,
            version_number,
            output_path: output_path.into(),
            generation_metadata,
            created_at: Utc::now(),
        }
    }
}
