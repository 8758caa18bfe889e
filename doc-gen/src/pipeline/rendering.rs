// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 4: document rendering (spec §4.7). The renderer collaborator is a
//! pure function of the assembled block tree and is given `version_intent`
//! as a provisional version number — `versioning::run` resolves the true,
//! dedup-aware version number afterwards and reconciles the blob under the
//! canonical storage key before it becomes durable.

use super::document_assembly::AssemblyOutcome;
use super::{GenerationRequest, PipelineHandler};
use doc_gen_domain::entities::{AuditAction, AuditEntityType, AuditLog, RenderedDocument};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::value_objects::{HashHex, RenderedDocumentId};
use serde_json::json;

pub struct RenderedOutcome {
    pub id: RenderedDocumentId,
    pub output_path: String,
    pub content_hash: HashHex,
    pub size_bytes: i64,
    pub block_count: i64,
}

pub async fn run(handler: &PipelineHandler, request: &GenerationRequest, assembly: &AssemblyOutcome) -> Result<RenderedOutcome, DocGenError> {
    let outcome = match handler.renderer.render(&request.document_id.to_string(), request.version_intent, &assembly.blocks).await {
        Ok(outcome) => outcome,
        Err(e) => {
            audit(handler, assembly.id.to_string(), AuditAction::DocumentRenderingFailed, json!({ "message": e.to_string() })).await;
            return Err(e);
        }
    };

    let rendered = RenderedDocument::new(assembly.id, outcome.output_path.clone(), outcome.content_hash.clone(), outcome.file_size, outcome.block_count);
    handler.rendered_document_repository.save(&rendered).await?;
    audit(
        handler,
        rendered.id.to_string(),
        AuditAction::DocumentRenderingCompleted,
        json!({ "output_path": rendered.output_path, "size_bytes": rendered.size_bytes }),
    )
    .await;

    Ok(RenderedOutcome {
        id: rendered.id,
        output_path: rendered.output_path,
        content_hash: rendered.content_hash,
        size_bytes: rendered.size_bytes,
        block_count: rendered.block_count,
    })
}

async fn audit(handler: &PipelineHandler, entity_id: String, action: AuditAction, metadata: serde_json::Value) {
    if let Err(e) = handler
        .audit_log_repository
        .append(&AuditLog::new(AuditEntityType::RenderedDocument, entity_id, action, metadata))
        .await
    {
        tracing::warn!(error = %e, "failed to append document-rendering audit entry");
    }
}
