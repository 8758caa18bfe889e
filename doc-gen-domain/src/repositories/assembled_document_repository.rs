// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::{AssembledDocument, RenderedDocument};
use crate::error::DocGenError;
use crate::value_objects::{AssembledDocumentId, SectionOutputBatchId};
use async_trait::async_trait;

#[async_trait]
pub trait AssembledDocumentRepository: Send + Sync {
    async fn save(&self, assembled: &AssembledDocument) -> Result<(), DocGenError>;
    async fn update(&self, assembled: &AssembledDocument) -> Result<(), DocGenError>;
    async fn find_by_id(&self, id: AssembledDocumentId) -> Result<Option<AssembledDocument>, DocGenError>;

    /// Guards the `ASSEMBLY_ALREADY_EXISTS` precondition (spec §4.6): an
    /// existing immutable row for the batch blocks re-assembly unless
    /// `force_reassembly` is set.
    async fn find_by_output_batch(&self, batch_id: SectionOutputBatchId) -> Result<Option<AssembledDocument>, DocGenError>;
}

#[async_trait]
pub trait RenderedDocumentRepository: Send + Sync {
    async fn save(&self, rendered: &RenderedDocument) -> Result<(), DocGenError>;
    async fn find_by_assembled_document(
        &self,
        assembled_document_id: AssembledDocumentId,
    ) -> Result<Option<RenderedDocument>, DocGenError>;
}
