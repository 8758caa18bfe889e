// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::DocumentVersion;
use crate::error::DocGenError;
use crate::value_objects::{DocumentId, HashHex};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentVersionRepository: Send + Sync {
    /// Inserts a new version row. Implementations must enforce the
    /// `(document_id, version_number)` uniqueness constraint and surface a
    /// violation distinctly so the versioning service can map it to
    /// `DUPLICATE_VERSION` (spec §4.8 step 6).
    async fn save(&self, version: &DocumentVersion) -> Result<(), DocGenError>;

    async fn find_by_document(&self, document_id: DocumentId) -> Result<Vec<DocumentVersion>, DocGenError>;

    async fn find_by_document_and_version(
        &self,
        document_id: DocumentId,
        version_number: i64,
    ) -> Result<Option<DocumentVersion>, DocGenError>;

    /// Content-dedup lookup (spec §4.8 step 3): `(document_id, content_hash)`
    /// resolving to an existing version, if any.
    async fn find_by_document_and_content_hash(
        &self,
        document_id: DocumentId,
        content_hash: &HashHex,
    ) -> Result<Option<DocumentVersion>, DocGenError>;

    async fn max_version_number(&self, document_id: DocumentId) -> Result<i64, DocGenError>;
}
