// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::infrastructure::sqlite::template_repository::parse_timestamp;
use async_trait::async_trait;
use doc_gen_domain::entities::{AuditAction, AuditEntityType, AuditLog};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::AuditLogRepository;
use doc_gen_domain::value_objects::AuditLogId;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteAuditLogRepository {
    pool: SqlitePool,
}

impl SqliteAuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for SqliteAuditLogRepository {
    async fn append(&self, entry: &AuditLog) -> Result<(), DocGenError> {
        sqlx::query("INSERT INTO audit_log (id, entity_type, entity_id, action, metadata, timestamp) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(entry.id.to_string())
            .bind(entity_type_str(entry.entity_type))
            .bind(&entry.entity_id)
            .bind(action_str(entry.action))
            .bind(entry.metadata.to_string())
            .bind(entry.timestamp.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_for_entity(&self, entity_type: AuditEntityType, entity_id: &str) -> Result<Vec<AuditLog>, DocGenError> {
        let rows = sqlx::query(
            "SELECT id, entity_type, entity_id, action, metadata, timestamp FROM audit_log
             WHERE entity_type = ? AND entity_id = ? ORDER BY timestamp ASC",
        )
        .bind(entity_type_str(entity_type))
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| {
                let metadata_raw: String = r.try_get("metadata")?;
                Ok(AuditLog {
                    id: AuditLogId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
                    entity_type: entity_type_from_str(&r.try_get::<String, _>("entity_type")?)?,
                    entity_id: r.try_get("entity_id")?,
                    action: action_from_str(&r.try_get::<String, _>("action")?)?,
                    metadata: serde_json::from_str(&metadata_raw)?,
                    timestamp: parse_timestamp(&r, "timestamp")?,
                })
            })
            .collect()
    }
}

fn entity_type_str(t: AuditEntityType) -> &'static str {
    match t {
        AuditEntityType::Template => "TEMPLATE",
        AuditEntityType::TemplateVersion => "TEMPLATE_VERSION",
        AuditEntityType::Document => "DOCUMENT",
        AuditEntityType::DocumentVersion => "DOCUMENT_VERSION",
        AuditEntityType::Section => "SECTION",
        AuditEntityType::Job => "JOB",
        AuditEntityType::GenerationBatch => "GENERATION_BATCH",
        AuditEntityType::SectionOutput => "SECTION_OUTPUT",
        AuditEntityType::SectionOutputBatch => "SECTION_OUTPUT_BATCH",
        AuditEntityType::AssembledDocument => "ASSEMBLED_DOCUMENT",
        AuditEntityType::RenderedDocument => "RENDERED_DOCUMENT",
    }
}

fn entity_type_from_str(s: &str) -> Result<AuditEntityType, DocGenError> {
    match s {
        "TEMPLATE" => Ok(AuditEntityType::Template),
        "TEMPLATE_VERSION" => Ok(AuditEntityType::TemplateVersion),
        "DOCUMENT" => Ok(AuditEntityType::Document),
        "DOCUMENT_VERSION" => Ok(AuditEntityType::DocumentVersion),
        "SECTION" => Ok(AuditEntityType::Section),
        "JOB" => Ok(AuditEntityType::Job),
        "GENERATION_BATCH" => Ok(AuditEntityType::GenerationBatch),
        "SECTION_OUTPUT" => Ok(AuditEntityType::SectionOutput),
        "SECTION_OUTPUT_BATCH" => Ok(AuditEntityType::SectionOutputBatch),
        "ASSEMBLED_DOCUMENT" => Ok(AuditEntityType::AssembledDocument),
        "RENDERED_DOCUMENT" => Ok(AuditEntityType::RenderedDocument),
        other => Err(DocGenError::internal(format!("unrecognized audit entity type: {other}"))),
    }
}

fn action_str(a: AuditAction) -> &'static str {
    match a {
        AuditAction::Create => "CREATE",
        AuditAction::UpdateCurrentVersion => "UPDATE_CURRENT_VERSION",
        AuditAction::GenerationInitiated => "GENERATION_INITIATED",
        AuditAction::SectionGenerationCompleted => "SECTION_GENERATION_COMPLETED",
        AuditAction::SectionGenerationFailed => "SECTION_GENERATION_FAILED",
        AuditAction::BatchGenerationCompleted => "BATCH_GENERATION_COMPLETED",
        AuditAction::BatchGenerationFailed => "BATCH_GENERATION_FAILED",
        AuditAction::DocumentAssemblyCompleted => "DOCUMENT_ASSEMBLY_COMPLETED",
        AuditAction::DocumentAssemblyFailed => "DOCUMENT_ASSEMBLY_FAILED",
        AuditAction::DocumentRenderingCompleted => "DOCUMENT_RENDERING_COMPLETED",
        AuditAction::DocumentRenderingFailed => "DOCUMENT_RENDERING_FAILED",
        AuditAction::DocumentVersionCreated => "DOCUMENT_VERSION_CREATED",
    }
}

fn action_from_str(s: &str) -> Result<AuditAction, DocGenError> {
    match s {
        "CREATE" => Ok(AuditAction::Create),
        "UPDATE_CURRENT_VERSION" => Ok(AuditAction::UpdateCurrentVersion),
        "GENERATION_INITIATED" => Ok(AuditAction::GenerationInitiated),
        "SECTION_GENERATION_COMPLETED" => Ok(AuditAction::SectionGenerationCompleted),
        "SECTION_GENERATION_FAILED" => Ok(AuditAction::SectionGenerationFailed),
        "BATCH_GENERATION_COMPLETED" => Ok(AuditAction::BatchGenerationCompleted),
        "BATCH_GENERATION_FAILED" => Ok(AuditAction::BatchGenerationFailed),
        "DOCUMENT_ASSEMBLY_COMPLETED" => Ok(AuditAction::DocumentAssemblyCompleted),
        "DOCUMENT_ASSEMBLY_FAILED" => Ok(AuditAction::DocumentAssemblyFailed),
        "DOCUMENT_RENDERING_COMPLETED" => Ok(AuditAction::DocumentRenderingCompleted),
        "DOCUMENT_RENDERING_FAILED" => Ok(AuditAction::DocumentRenderingFailed),
        "DOCUMENT_VERSION_CREATED" => Ok(AuditAction::DocumentVersionCreated),
        other => Err(DocGenError::internal(format!("unrecognized audit action: {other}"))),
    }
}
