// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::{SectionOutput, SectionOutputBatch};
use crate::error::DocGenError;
use crate::value_objects::{DocumentId, SectionId, SectionOutputBatchId};
use async_trait::async_trait;

#[async_trait]
pub trait SectionOutputRepository: Send + Sync {
    async fn save_batch(&self, batch: &SectionOutputBatch) -> Result<(), DocGenError>;
    async fn update_batch(&self, batch: &SectionOutputBatch) -> Result<(), DocGenError>;
    async fn find_batch(&self, id: SectionOutputBatchId) -> Result<Option<SectionOutputBatch>, DocGenError>;

    async fn save_output(&self, output: &SectionOutput) -> Result<(), DocGenError>;
    async fn update_output(&self, output: &SectionOutput) -> Result<(), DocGenError>;

    /// Only VALIDATED outputs are consumable by assembly (spec §4.6
    /// precondition).
    async fn find_validated_for_batch(&self, batch_id: SectionOutputBatchId) -> Result<Vec<SectionOutput>, DocGenError>;

    async fn find_all_for_batch(&self, batch_id: SectionOutputBatchId) -> Result<Vec<SectionOutput>, DocGenError>;

    /// Most recent VALIDATED output ever produced for `section_id` against
    /// `document_id`, found by joining through the owning input batch since
    /// `SectionOutput` carries no `document_id` of its own. Backs the
    /// REGENERATE_SECTIONS content-reuse path (spec §4.3).
    async fn find_latest_validated_for_document_section(
        &self,
        document_id: DocumentId,
        section_id: SectionId,
    ) -> Result<Option<SectionOutput>, DocGenError>;
}
