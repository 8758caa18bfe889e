// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Five-stage generation pipeline (spec §4.3): input preparation, section
//! generation, document assembly, document rendering, versioning. Grounded
//! on
//! `original_source/backend/app/worker/handlers/generation_pipeline.py`'s
//! `GenerationPipelineHandler` — one struct carrying every repository and
//! collaborator port the stages need, run sequentially over a single
//! in-memory `PipelineState`.

pub mod document_assembly;
pub mod input_preparation;
pub mod rendering;
pub mod section_generation;
pub mod versioning;

use doc_gen_domain::entities::{AuditAction, AuditEntityType, AuditLog, JobPayload};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::{
    AssembledDocumentRepository, AuditLogRepository, DocumentRepository, DocumentVersionRepository,
    GenerationInputRepository, RenderedDocumentRepository, SectionOutputRepository, SectionRepository,
    TemplateVersionRepository,
};
use doc_gen_domain::services::{LlmClient, MetricsRecorder, ObjectStore, Renderer};
use doc_gen_domain::value_objects::{DocumentId, PipelineStage, PipelineState, SectionId, TemplateVersionId};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Everything a generation run consumes, decoded from a `JobPayload::
/// Generate`/`Regenerate`/`RegenerateSections` variant by the scheduler
/// before the handler runs (spec §4.3 contract step 1: id validation
/// happens at payload-decode time, never mid-pipeline).
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub template_version_id: TemplateVersionId,
    pub document_id: DocumentId,
    pub version_intent: i64,
    pub client_data: Value,
    /// Set by REGENERATE/REGENERATE_SECTIONS to bypass the `ASSEMBLY_
    /// ALREADY_EXISTS` guard (spec §4.6 precondition).
    pub force_reassembly: bool,
    /// `Some(ids)` restricts input preparation and section generation to
    /// just these dynamic sections (REGENERATE_SECTIONS); `None` means every
    /// dynamic section, as for GENERATE/REGENERATE.
    pub section_ids: Option<Vec<SectionId>>,
    /// Dynamic sections excluded from `section_ids` whose most recent
    /// validated output is carried into this run's output batch instead of
    /// being regenerated.
    pub reuse_section_ids: Vec<SectionId>,
}

impl GenerationRequest {
    /// Builds a request from a decoded job payload, grounded on
    /// `original_source/backend/app/worker/handlers/regeneration.py`'s
    /// observation that REGENERATE/REGENERATE_SECTIONS are thin wrappers
    /// around the same five-stage handler with forced reassembly.
    pub fn from_payload(payload: &JobPayload, default_template_version_id: TemplateVersionId) -> Result<Self, DocGenError> {
        match payload {
            JobPayload::Generate {
                template_version_id,
                document_id,
                version_intent,
                client_data,
            } => Ok(Self {
                template_version_id: *template_version_id,
                document_id: *document_id,
                version_intent: version_intent.unwrap_or(1),
                client_data: client_data.clone().unwrap_or(Value::Null),
                force_reassembly: false,
                section_ids: None,
                reuse_section_ids: Vec::new(),
            }),
            JobPayload::Regenerate {
                document_id,
                version_intent,
                client_data,
                ..
            } => Ok(Self {
                template_version_id: default_template_version_id,
                document_id: *document_id,
                version_intent: *version_intent,
                client_data: client_data.clone().unwrap_or(Value::Null),
                force_reassembly: true,
                section_ids: None,
                reuse_section_ids: Vec::new(),
            }),
            JobPayload::RegenerateSections {
                document_id,
                template_version_id,
                version_intent,
                section_ids,
                reuse_section_ids,
                client_data,
                ..
            } => {
                if section_ids.is_empty() {
                    return Err(DocGenError::internal("REGENERATE_SECTIONS requires at least one section id"));
                }
                Ok(Self {
                    template_version_id: template_version_id.unwrap_or(default_template_version_id),
                    document_id: *document_id,
                    version_intent: *version_intent,
                    client_data: client_data.clone().unwrap_or(Value::Null),
                    force_reassembly: true,
                    section_ids: Some(section_ids.clone()),
                    reuse_section_ids: reuse_section_ids.clone(),
                })
            }
            other => Err(DocGenError::internal(format!("{other:?} is not a generation payload"))),
        }
    }
}

pub struct PipelineHandler {
    pub template_version_repository: Arc<dyn TemplateVersionRepository>,
    pub section_repository: Arc<dyn SectionRepository>,
    pub generation_input_repository: Arc<dyn GenerationInputRepository>,
    pub section_output_repository: Arc<dyn SectionOutputRepository>,
    pub assembled_document_repository: Arc<dyn AssembledDocumentRepository>,
    pub rendered_document_repository: Arc<dyn RenderedDocumentRepository>,
    pub document_repository: Arc<dyn DocumentRepository>,
    pub document_version_repository: Arc<dyn DocumentVersionRepository>,
    pub audit_log_repository: Arc<dyn AuditLogRepository>,
    pub object_store: Arc<dyn ObjectStore>,
    pub llm_client: Arc<dyn LlmClient>,
    pub renderer: Arc<dyn Renderer>,
    pub metrics: Arc<dyn MetricsRecorder>,
}

impl PipelineHandler {
    /// Runs every stage sequentially, never advancing past the stage that
    /// fails (spec §4.3 contract step 2). Always returns a `PipelineState`
    /// — there is no `Result` at this boundary, because a failed pipeline
    /// run is still a complete, reportable outcome, not an exceptional one.
    pub async fn run(&self, request: GenerationRequest) -> PipelineState {
        let mut state = PipelineState::starting();

        if let Err(e) = self
            .audit_log_repository
            .append(&AuditLog::new(
                AuditEntityType::Document,
                request.document_id.to_string(),
                AuditAction::GenerationInitiated,
                json!({
                    "template_version_id": request.template_version_id.to_string(),
                    "version_intent": request.version_intent,
                }),
            ))
            .await
        {
            tracing::warn!(error = %e, "failed to append GENERATION_INITIATED audit entry");
        }

        let prepared = match self.timed(PipelineStage::InputPreparation, input_preparation::run(self, &request)).await {
            Ok(prepared) => prepared,
            Err(e) => {
                state.fail(PipelineStage::InputPreparation, e.to_string());
                return state;
            }
        };
        state.input_batch_id = Some(prepared.batch_id);
        state.current_stage = Some(PipelineStage::SectionGeneration);

        let output_batch_id = match self
            .timed(
                PipelineStage::SectionGeneration,
                section_generation::run(self, prepared.batch_id, request.document_id, &prepared.reuse_section_ids),
            )
            .await
        {
            Ok(id) => id,
            Err(e) => {
                state.fail(PipelineStage::SectionGeneration, e.to_string());
                return state;
            }
        };
        state.output_batch_id = Some(output_batch_id);
        state.current_stage = Some(PipelineStage::DocumentAssembly);

        let assembly = match self
            .timed(PipelineStage::DocumentAssembly, document_assembly::run(self, &request, output_batch_id))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                state.fail(PipelineStage::DocumentAssembly, e.to_string());
                return state;
            }
        };
        state.assembled_document_id = Some(assembly.id);
        state.current_stage = Some(PipelineStage::DocumentRendering);

        let rendered = match self
            .timed(PipelineStage::DocumentRendering, rendering::run(self, &request, &assembly))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                state.fail(PipelineStage::DocumentRendering, e.to_string());
                return state;
            }
        };
        state.rendered_document_id = Some(rendered.id);
        state.current_stage = Some(PipelineStage::Versioning);

        match self.timed(PipelineStage::Versioning, versioning::run(self, &request, &rendered)).await {
            Ok(outcome) => {
                state.version_id = Some(outcome.id);
                state.version_number = Some(outcome.version_number);
                state.output_path = Some(outcome.output_path);
                state.complete();
            }
            Err(e) => state.fail(PipelineStage::Versioning, e.to_string()),
        }

        state
    }

    async fn timed<T>(&self, stage: PipelineStage, fut: impl std::future::Future<Output = Result<T, DocGenError>>) -> Result<T, DocGenError> {
        let started = Instant::now();
        let result = fut.await;
        self.metrics.stage_duration(stage.as_str(), started.elapsed().as_secs_f64());
        result
    }
}
