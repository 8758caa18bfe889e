// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;
use doc_gen_domain::entities::{AssembledDocument, InjectionResult, RenderedDocument};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::{AssembledDocumentRepository, RenderedDocumentRepository};
use doc_gen_domain::value_objects::{
    AssembledDocumentId, AssemblyStatus, DocumentId, RenderedDocumentId, SectionOutputBatchId, TemplateVersionId,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteAssembledDocumentRepository {
    pool: SqlitePool,
}

impl SqliteAssembledDocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssembledDocumentRepository for SqliteAssembledDocumentRepository {
    async fn save(&self, assembled: &AssembledDocument) -> Result<(), DocGenError> {
        let injection_results = serde_json::to_string(&assembled.injection_results)?;
        sqlx::query(
            "INSERT INTO assembled_documents
             (id, document_id, template_version_id, version_intent, section_output_batch_id, status, assembly_hash, original_block_count, assembled_block_count, injection_results, is_immutable)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(assembled.id.to_string())
        .bind(assembled.document_id.to_string())
        .bind(assembled.template_version_id.to_string())
        .bind(assembled.version_intent)
        .bind(assembled.section_output_batch_id.to_string())
        .bind(assembly_status_str(assembled.status))
        .bind(&assembled.assembly_hash)
        .bind(assembled.original_block_count)
        .bind(assembled.assembled_block_count)
        .bind(injection_results)
        .bind(assembled.is_immutable)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, assembled: &AssembledDocument) -> Result<(), DocGenError> {
        let injection_results = serde_json::to_string(&assembled.injection_results)?;
        sqlx::query(
            "UPDATE assembled_documents SET status = ?, assembly_hash = ?, original_block_count = ?, assembled_block_count = ?, injection_results = ?, is_immutable = ?
             WHERE id = ?",
        )
        .bind(assembly_status_str(assembled.status))
        .bind(&assembled.assembly_hash)
        .bind(assembled.original_block_count)
        .bind(assembled.assembled_block_count)
        .bind(injection_results)
        .bind(assembled.is_immutable)
        .bind(assembled.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: AssembledDocumentId) -> Result<Option<AssembledDocument>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, document_id, template_version_id, version_intent, section_output_batch_id, status, assembly_hash, original_block_count, assembled_block_count, injection_results, is_immutable
             FROM assembled_documents WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_assembled_document).transpose()
    }

    async fn find_by_output_batch(&self, batch_id: SectionOutputBatchId) -> Result<Option<AssembledDocument>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, document_id, template_version_id, version_intent, section_output_batch_id, status, assembly_hash, original_block_count, assembled_block_count, injection_results, is_immutable
             FROM assembled_documents WHERE section_output_batch_id = ?",
        )
        .bind(batch_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_assembled_document).transpose()
    }
}

fn row_to_assembled_document(r: sqlx::sqlite::SqliteRow) -> Result<AssembledDocument, DocGenError> {
    let injection_results_raw: String = r.try_get("injection_results")?;
    Ok(AssembledDocument {
        id: AssembledDocumentId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        document_id: DocumentId::from_str(r.try_get::<String, _>("document_id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        template_version_id: TemplateVersionId::from_str(r.try_get::<String, _>("template_version_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        version_intent: r.try_get("version_intent")?,
        section_output_batch_id: SectionOutputBatchId::from_str(r.try_get::<String, _>("section_output_batch_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        status: assembly_status_from_str(&r.try_get::<String, _>("status")?)?,
        assembly_hash: r.try_get("assembly_hash")?,
        original_block_count: r.try_get("original_block_count")?,
        assembled_block_count: r.try_get("assembled_block_count")?,
        injection_results: serde_json::from_str::<Vec<InjectionResult>>(&injection_results_raw)?,
        is_immutable: r.try_get("is_immutable")?,
    })
}

fn assembly_status_str(s: AssemblyStatus) -> &'static str {
    match s {
        AssemblyStatus::Pending => "PENDING",
        AssemblyStatus::InProgress => "IN_PROGRESS",
        AssemblyStatus::Completed => "COMPLETED",
        AssemblyStatus::Validated => "VALIDATED",
        AssemblyStatus::Failed => "FAILED",
    }
}

fn assembly_status_from_str(s: &str) -> Result<AssemblyStatus, DocGenError> {
    match s {
        "PENDING" => Ok(AssemblyStatus::Pending),
        "IN_PROGRESS" => Ok(AssemblyStatus::InProgress),
        "COMPLETED" => Ok(AssemblyStatus::Completed),
        "VALIDATED" => Ok(AssemblyStatus::Validated),
        "FAILED" => Ok(AssemblyStatus::Failed),
        other => Err(DocGenError::internal(format!("unrecognized assembly status: {other}"))),
    }
}

pub struct SqliteRenderedDocumentRepository {
    pool: SqlitePool,
}

impl SqliteRenderedDocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RenderedDocumentRepository for SqliteRenderedDocumentRepository {
    async fn save(&self, rendered: &RenderedDocument) -> Result<(), DocGenError> {
        sqlx::query(
            "INSERT INTO rendered_documents (id, assembled_document_id, output_path, content_hash, size_bytes, block_count) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(rendered.id.to_string())
        .bind(rendered.assembled_document_id.to_string())
        .bind(&rendered.output_path)
        .bind(&rendered.content_hash)
        .bind(rendered.size_bytes)
        .bind(rendered.block_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_assembled_document(&self, assembled_document_id: AssembledDocumentId) -> Result<Option<RenderedDocument>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, assembled_document_id, output_path, content_hash, size_bytes, block_count FROM rendered_documents WHERE assembled_document_id = ?",
        )
        .bind(assembled_document_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| {
            Ok(RenderedDocument {
                id: RenderedDocumentId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
                assembled_document_id: AssembledDocumentId::from_str(r.try_get::<String, _>("assembled_document_id")?.as_str())
                    .map_err(|e| DocGenError::internal(e.to_string()))?,
                output_path: r.try_get("output_path")?,
                content_hash: r.try_get("content_hash")?,
                size_bytes: r.try_get("size_bytes")?,
                block_count: r.try_get("block_count")?,
            })
        })
        .transpose()
    }
}
