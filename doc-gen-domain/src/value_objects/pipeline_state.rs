// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Pipeline state tracking for the five-stage generation handler (spec §4.3),
//! grounded on
//! `original_source/backend/app/worker/handlers/generation_pipeline.py`'s
//! `PipelineStage` / `PipelineState`.

use crate::value_objects::ids::{
    AssembledDocumentId, DocumentVersionId, GenerationInputBatchId, RenderedDocumentId, SectionOutputBatchId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PipelineStage {
    InputPreparation,
    SectionGeneration,
    DocumentAssembly,
    DocumentRendering,
    Versioning,
    Completed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::InputPreparation => "INPUT_PREPARATION",
            PipelineStage::SectionGeneration => "SECTION_GENERATION",
            PipelineStage::DocumentAssembly => "DOCUMENT_ASSEMBLY",
            PipelineStage::DocumentRendering => "DOCUMENT_RENDERING",
            PipelineStage::Versioning => "VERSIONING",
            PipelineStage::Completed => "COMPLETED",
        }
    }
}

/// In-memory state carried across the five stages. Every id field is
/// populated only once its stage has committed, so a failure result always
/// reports exactly the artifacts reached so far (spec §4.3 contract #2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    pub current_stage: Option<PipelineStage>,
    pub input_batch_id: Option<GenerationInputBatchId>,
    pub output_batch_id: Option<SectionOutputBatchId>,
    pub assembled_document_id: Option<AssembledDocumentId>,
    pub rendered_document_id: Option<RenderedDocumentId>,
    pub version_id: Option<DocumentVersionId>,
    pub version_number: Option<i64>,
    pub output_path: Option<String>,
    pub error: Option<String>,
    pub error_stage: Option<PipelineStage>,
}

impl PipelineState {
    pub fn starting() -> Self {
        Self {
            current_stage: Some(PipelineStage::InputPreparation),
            ..Default::default()
        }
    }

    /// Records a stage failure: prefixes the message with the stage name
    /// (spec §4.3 contract #2) and sets `error_stage` so downstream code
    /// never needs to re-derive attribution.
    pub fn fail(&mut self, stage: PipelineStage, message: impl Into<String>) {
        self.error = Some(format!("{}: {}", stage.as_str(), message.into()));
        self.error_stage = Some(stage);
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn complete(&mut self) {
        self.current_stage = Some(PipelineStage::Completed);
    }
}
