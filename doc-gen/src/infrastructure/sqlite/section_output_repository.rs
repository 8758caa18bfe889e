// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;
use doc_gen_domain::entities::{SectionOutput, SectionOutputBatch};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::SectionOutputRepository;
use doc_gen_domain::value_objects::{
    DocumentId, GenerationInputBatchId, SectionId, SectionOutputBatchId, SectionOutputId, SectionOutputStatus,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteSectionOutputRepository {
    pool: SqlitePool,
}

impl SqliteSectionOutputRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionOutputRepository for SqliteSectionOutputRepository {
    async fn save_batch(&self, batch: &SectionOutputBatch) -> Result<(), DocGenError> {
        sqlx::query("INSERT INTO section_output_batches (id, input_batch_id, total_outputs, failed_count) VALUES (?, ?, ?, ?)")
            .bind(batch.id.to_string())
            .bind(batch.input_batch_id.to_string())
            .bind(batch.total_outputs)
            .bind(batch.failed_count)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_batch(&self, batch: &SectionOutputBatch) -> Result<(), DocGenError> {
        sqlx::query("UPDATE section_output_batches SET total_outputs = ?, failed_count = ? WHERE id = ?")
            .bind(batch.total_outputs)
            .bind(batch.failed_count)
            .bind(batch.id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_batch(&self, id: SectionOutputBatchId) -> Result<Option<SectionOutputBatch>, DocGenError> {
        let row = sqlx::query("SELECT id, input_batch_id, total_outputs, failed_count FROM section_output_batches WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            Ok(SectionOutputBatch {
                id: SectionOutputBatchId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
                input_batch_id: GenerationInputBatchId::from_str(r.try_get::<String, _>("input_batch_id")?.as_str())
                    .map_err(|e| DocGenError::internal(e.to_string()))?,
                total_outputs: r.try_get("total_outputs")?,
                failed_count: r.try_get("failed_count")?,
            })
        })
        .transpose()
    }

    async fn save_output(&self, output: &SectionOutput) -> Result<(), DocGenError> {
        sqlx::query(
            "INSERT INTO section_outputs (id, output_batch_id, input_batch_id, section_id, status, generated_content, content_hash, is_validated, is_immutable)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(output.id.to_string())
        .bind(output.output_batch_id.to_string())
        .bind(output.input_batch_id.to_string())
        .bind(output.section_id.value())
        .bind(section_output_status_str(output.status))
        .bind(&output.generated_content)
        .bind(&output.content_hash)
        .bind(output.is_validated)
        .bind(output.is_immutable)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_output(&self, output: &SectionOutput) -> Result<(), DocGenError> {
        sqlx::query(
            "UPDATE section_outputs SET status = ?, generated_content = ?, content_hash = ?, is_validated = ?, is_immutable = ? WHERE id = ?",
        )
        .bind(section_output_status_str(output.status))
        .bind(&output.generated_content)
        .bind(&output.content_hash)
        .bind(output.is_validated)
        .bind(output.is_immutable)
        .bind(output.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_validated_for_batch(&self, batch_id: SectionOutputBatchId) -> Result<Vec<SectionOutput>, DocGenError> {
        let rows = sqlx::query(
            "SELECT id, output_batch_id, input_batch_id, section_id, status, generated_content, content_hash, is_validated, is_immutable
             FROM section_outputs WHERE output_batch_id = ? AND status = 'VALIDATED'",
        )
        .bind(batch_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_section_output).collect()
    }

    async fn find_all_for_batch(&self, batch_id: SectionOutputBatchId) -> Result<Vec<SectionOutput>, DocGenError> {
        let rows = sqlx::query(
            "SELECT id, output_batch_id, input_batch_id, section_id, status, generated_content, content_hash, is_validated, is_immutable
             FROM section_outputs WHERE output_batch_id = ?",
        )
        .bind(batch_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_section_output).collect()
    }

    async fn find_latest_validated_for_document_section(
        &self,
        document_id: DocumentId,
        section_id: SectionId,
    ) -> Result<Option<SectionOutput>, DocGenError> {
        let row = sqlx::query(
            "SELECT so.id, so.output_batch_id, so.input_batch_id, so.section_id, so.status, so.generated_content, so.content_hash, so.is_validated, so.is_immutable
             FROM section_outputs so
             JOIN generation_input_batches gib ON gib.id = so.input_batch_id
             WHERE gib.document_id = ? AND so.section_id = ? AND so.status = 'VALIDATED'
             ORDER BY gib.version_intent DESC
             LIMIT 1",
        )
        .bind(document_id.to_string())
        .bind(section_id.value())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_section_output).transpose()
    }
}

fn row_to_section_output(r: sqlx::sqlite::SqliteRow) -> Result<SectionOutput, DocGenError> {
    Ok(SectionOutput {
        id: SectionOutputId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        output_batch_id: SectionOutputBatchId::from_str(r.try_get::<String, _>("output_batch_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        input_batch_id: GenerationInputBatchId::from_str(r.try_get::<String, _>("input_batch_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        section_id: SectionId::new(r.try_get("section_id")?),
        status: section_output_status_from_str(&r.try_get::<String, _>("status")?)?,
        generated_content: r.try_get("generated_content")?,
        content_hash: r.try_get("content_hash")?,
        is_validated: r.try_get("is_validated")?,
        is_immutable: r.try_get("is_immutable")?,
    })
}

fn section_output_status_str(s: SectionOutputStatus) -> &'static str {
    match s {
        SectionOutputStatus::Pending => "PENDING",
        SectionOutputStatus::Generated => "GENERATED",
        SectionOutputStatus::Validated => "VALIDATED",
        SectionOutputStatus::Failed => "FAILED",
    }
}

fn section_output_status_from_str(s: &str) -> Result<SectionOutputStatus, DocGenError> {
    match s {
        "PENDING" => Ok(SectionOutputStatus::Pending),
        "GENERATED" => Ok(SectionOutputStatus::Generated),
        "VALIDATED" => Ok(SectionOutputStatus::Validated),
        "FAILED" => Ok(SectionOutputStatus::Failed),
        other => Err(DocGenError::internal(format!("unrecognized section output status: {other}"))),
    }
}
