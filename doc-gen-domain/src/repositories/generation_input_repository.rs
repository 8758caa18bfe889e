// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::{GenerationInput, GenerationInputBatch};
use crate::error::DocGenError;
use crate::value_objects::GenerationInputBatchId;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationInputRepository: Send + Sync {
    /// Persists a PENDING batch row and its inputs in a single transaction
    /// (spec §4.4 step 6).
    async fn save_batch_with_inputs(
        &self,
        batch: &GenerationInputBatch,
        inputs: &[GenerationInput],
    ) -> Result<(), DocGenError>;

    /// The only permitted post-creation mutation: PENDING → VALIDATED.
    async fn validate_batch(&self, batch: &GenerationInputBatch) -> Result<(), DocGenError>;

    async fn find_batch(&self, id: GenerationInputBatchId) -> Result<Option<GenerationInputBatch>, DocGenError>;

    async fn find_inputs_for_batch(&self, batch_id: GenerationInputBatchId) -> Result<Vec<GenerationInput>, DocGenError>;
}
