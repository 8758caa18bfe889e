// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Decodes a claimed job's payload and dispatches to the handler for its
//! type, grounded on
//! `original_source/backend/app/worker/handlers/__init__.py`'s job-type
//! dispatch table. PARSE and CLASSIFY are handled directly here; the three
//! generation variants are thin wrappers around `PipelineHandler::run`.

use crate::infrastructure::classification::ClassificationService;
use crate::pipeline::{GenerationRequest, PipelineHandler};
use doc_gen_domain::entities::{JobPayload, TemplateVersion};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::{DocumentRepository, TemplateVersionRepository};
use doc_gen_domain::services::{ObjectStore, TemplateParser};
use doc_gen_domain::value_objects::{canonical_json_hash, ParsedDocument, TemplateVersionId};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct JobHandlers {
    pub template_parser: Arc<dyn TemplateParser>,
    pub classification_service: Arc<ClassificationService>,
    pub pipeline: Arc<PipelineHandler>,
}

impl JobHandlers {
    /// Runs the handler for `payload`, returning its result plus the
    /// successor payload to enqueue for pipeline advancement (spec §4.2):
    /// PARSE advances to CLASSIFY; no other job type advances automatically.
    pub async fn run(&self, payload: &JobPayload) -> Result<(Value, Option<JobPayload>), DocGenError> {
        match payload {
            JobPayload::Parse { template_version_id } => {
                let result = self.handle_parse(*template_version_id).await?;
                Ok((result, Some(JobPayload::Classify { template_version_id: *template_version_id })))
            }
            JobPayload::Classify { template_version_id } => Ok((self.handle_classify(*template_version_id).await?, None)),
            JobPayload::Generate { .. } | JobPayload::Regenerate { .. } | JobPayload::RegenerateSections { .. } => {
                Ok((self.handle_generation(payload).await?, None))
            }
        }
    }

    async fn handle_parse(&self, template_version_id: TemplateVersionId) -> Result<Value, DocGenError> {
        let repo: &Arc<dyn TemplateVersionRepository> = &self.pipeline.template_version_repository;
        let mut version = repo
            .find_by_id(template_version_id)
            .await?
            .ok_or_else(|| DocGenError::not_found(format!("template version {template_version_id}")))?;

        version.mark_in_progress()?;
        repo.update(&version).await?;

        match self.parse_and_store(&version).await {
            Ok((parsed_path, content_hash)) => {
                version.mark_completed(parsed_path.clone(), content_hash.clone())?;
                repo.update(&version).await?;
                Ok(json!({ "parsed_path": parsed_path, "content_hash": content_hash }))
            }
            Err(e) => {
                version.mark_failed(e.to_string())?;
                repo.update(&version).await?;
                Err(e)
            }
        }
    }

    async fn parse_and_store(&self, version: &TemplateVersion) -> Result<(String, String), DocGenError> {
        let source_bytes = self
            .pipeline
            .object_store
            .get(&version.source_path)
            .await?
            .ok_or_else(|| DocGenError::not_found(format!("template source blob at {}", version.source_path)))?;

        let parsed = self.template_parser.parse(version.template_id, version.id, &source_bytes).await?;

        let document = ParsedDocument {
            template_version_id: version.id,
            template_id: version.template_id,
            version_number: version.version_number,
            content_hash: String::new(),
            metadata: Value::Null,
            blocks: parsed.blocks,
            headers: parsed.headers,
            footers: parsed.footers,
        };
        let content_hash = canonical_json_hash(&serde_json::to_value(&document)?);
        let document = ParsedDocument { content_hash: content_hash.clone(), ..document };

        let parsed_path = crate::infrastructure::object_store::template_parsed_key(&version.template_id.to_string(), version.version_number);
        let bytes = serde_json::to_vec(&document)?;
        self.pipeline.object_store.put(&parsed_path, bytes, Some("application/json")).await?;

        Ok((parsed_path, content_hash))
    }

    async fn handle_classify(&self, template_version_id: TemplateVersionId) -> Result<Value, DocGenError> {
        let version = self
            .pipeline
            .template_version_repository
            .find_by_id(template_version_id)
            .await?
            .ok_or_else(|| DocGenError::not_found(format!("template version {template_version_id}")))?;

        let parsed_path = version
            .parsed_path
            .as_ref()
            .ok_or_else(|| DocGenError::internal(format!("template version {template_version_id} has not been parsed")))?;
        let bytes = self
            .pipeline
            .object_store
            .get(parsed_path)
            .await?
            .ok_or_else(|| DocGenError::not_found(format!("parsed document at {parsed_path}")))?;
        let document: ParsedDocument = serde_json::from_slice(&bytes)?;

        let sections = self.classification_service.classify_template_version(template_version_id, &document.blocks).await?;

        Ok(json!({ "section_count": sections.len() }))
    }

    async fn handle_generation(&self, payload: &JobPayload) -> Result<Value, DocGenError> {
        let default_template_version_id = self.resolve_default_template_version(payload).await?;
        let request = GenerationRequest::from_payload(payload, default_template_version_id)?;
        let state = self.pipeline.run(request).await;

        if state.is_failed() {
            return Err(DocGenError::Job(state.error.unwrap_or_else(|| "generation pipeline failed".to_string())));
        }
        Ok(serde_json::to_value(state)?)
    }

    async fn resolve_default_template_version(&self, payload: &JobPayload) -> Result<TemplateVersionId, DocGenError> {
        match payload {
            JobPayload::Generate { template_version_id, .. } => Ok(*template_version_id),
            JobPayload::Regenerate { document_id, .. } | JobPayload::RegenerateSections { document_id, .. } => {
                let document = self
                    .pipeline
                    .document_repository
                    .find_by_id(*document_id)
                    .await?
                    .ok_or_else(|| DocGenError::not_found(format!("document {document_id}")))?;
                Ok(document.template_version_id)
            }
            other => Err(DocGenError::internal(format!("{other:?} is not a generation payload"))),
        }
    }
}
