// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::{AssembledDocumentId, HashHex, RenderedDocumentId};
use serde::{Deserialize, Serialize};

/// Artifact binding: row ↔ object-storage blob (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub id: RenderedDocumentId,
    pub assembled_document_id: AssembledDocumentId,
    pub output_path: String,
    pub content_hash: HashHex,
    pub size_bytes: i64,
    pub block_count: i64,
}

impl RenderedDocument {
    pub fn new(
        assembled_document_id: AssembledDocumentId,
        output_path: impl Into<String>,
        content_hash: HashHex,
        size_bytes: i64,
        block_count: i64,
    ) -> Self {
        Self {
            id: RenderedDocumentId::new(),
            assembled_document_id,
            output_path: output_path.into(),
            content_hash,
            size_bytes,
            block_count,
        }
    }
}
