// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 5: versioning (spec §4.8), grounded on
//! `original_source/backend/app/domains/versioning/service.py`'s
//! `DocumentVersioningService`: content-hash dedup, write-then-verify-then-
//! commit storage, `current_version` advancement, audit trail.

use super::rendering::RenderedOutcome;
use super::{GenerationRequest, PipelineHandler};
use doc_gen_domain::entities::{AuditAction, AuditEntityType, AuditLog, DocumentVersion, GenerationMetadata};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::value_objects::{DocumentVersionId, VersioningErrorCode};
use serde_json::json;

pub struct VersioningOutcome {
    pub id: DocumentVersionId,
    pub version_number: i64,
    pub output_path: String,
    /// `true` when this run resolved to a pre-existing version via content
    /// dedup rather than creating a new row (spec §4.8 step 3).
    pub is_duplicate: bool,
}

pub async fn run(handler: &PipelineHandler, request: &GenerationRequest, rendered: &RenderedOutcome) -> Result<VersioningOutcome, DocGenError> {
    let mut document = handler
        .document_repository
        .find_by_id(request.document_id)
        .await?
        .ok_or_else(|| versioning_error(VersioningErrorCode::DocumentNotFound, format!("document {} not found", request.document_id)))?;

    if let Some(existing) = handler
        .document_version_repository
        .find_by_document_and_content_hash(request.document_id, &rendered.content_hash)
        .await?
    {
        return Ok(VersioningOutcome {
            id: existing.id,
            version_number: existing.version_number,
            output_path: existing.output_path,
            is_duplicate: true,
        });
    }

    let version_number = handler.document_version_repository.max_version_number(request.document_id).await? + 1;
    let output_path = crate::infrastructure::object_store::document_output_key(&request.document_id.to_string(), version_number);

    let bytes = handler
        .object_store
        .get(&rendered.output_path)
        .await?
        .ok_or_else(|| versioning_error(VersioningErrorCode::StorageFailed, format!("rendered blob missing at {}", rendered.output_path)))?;
    handler.object_store.put(&output_path, bytes, None).await?;
    if !handler.object_store.exists(&output_path).await? {
        handler.object_store.delete(&output_path).await.ok();
        return Err(versioning_error(VersioningErrorCode::StorageFailed, format!("blob did not verify at {output_path}")));
    }

    let version = DocumentVersion::new(
        request.document_id,
        version_number,
        output_path.clone(),
        GenerationMetadata {
            content_hash: rendered.content_hash.clone(),
            file_size_bytes: rendered.size_bytes,
        },
    );

    if let Err(e) = handler.document_version_repository.save(&version).await {
        handler.object_store.delete(&output_path).await.ok();
        return Err(e);
    }

    if let Err(e) = document.advance_version(version_number) {
        return Err(versioning_error(VersioningErrorCode::PersistenceFailed, e.to_string()));
    }
    handler.document_repository.update(&document).await.map_err(|e| versioning_error(VersioningErrorCode::PersistenceFailed, e.to_string()))?;

    handler
        .audit_log_repository
        .append(&AuditLog::new(
            AuditEntityType::DocumentVersion,
            version.id.to_string(),
            AuditAction::DocumentVersionCreated,
            json!({
                "document_id": request.document_id.to_string(),
                "version_number": version_number,
                "content_hash": rendered.content_hash,
                "block_count": rendered.block_count,
            }),
        ))
        .await?;
    handler
        .audit_log_repository
        .append(&AuditLog::new(
            AuditEntityType::Document,
            document.id.to_string(),
            AuditAction::UpdateCurrentVersion,
            json!({ "current_version": version_number }),
        ))
        .await?;

    Ok(VersioningOutcome {
        id: version.id,
        version_number,
        output_path,
        is_duplicate: false,
    })
}

/// Integrity verification (spec §4.8 "Integrity verification" clause):
/// re-derives the stored blob's hash and compares it against the row's
/// recorded `content_hash`, independent of whatever wrote it.
pub async fn verify(handler: &PipelineHandler, document_id: doc_gen_domain::value_objects::DocumentId, version_number: i64) -> Result<bool, DocGenError> {
    let version = handler
        .document_version_repository
        .find_by_document_and_version(document_id, version_number)
        .await?
        .ok_or_else(|| versioning_error(VersioningErrorCode::DocumentNotFound, format!("no version {version_number} for document {document_id}")))?;

    let bytes = handler
        .object_store
        .get(&version.output_path)
        .await?
        .ok_or_else(|| versioning_error(VersioningErrorCode::StorageFailed, format!("blob missing at {}", version.output_path)))?;

    let actual_hash = doc_gen_domain::value_objects::bytes_hash(&bytes);
    Ok(actual_hash == version.generation_metadata.content_hash)
}

fn versioning_error(code: VersioningErrorCode, message: impl Into<String>) -> DocGenError {
    DocGenError::Versioning { code, message: message.into() }
}
