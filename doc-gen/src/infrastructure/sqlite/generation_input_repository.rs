// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::infrastructure::sqlite::template_repository::parse_timestamp;
use async_trait::async_trait;
use doc_gen_domain::entities::{GenerationInput, GenerationInputBatch};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::GenerationInputRepository;
use doc_gen_domain::value_objects::{
    BatchStatus, DocumentId, GenerationInputBatchId, GenerationInputId, GenerationInputSnapshot, SectionId, TemplateVersionId,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteGenerationInputRepository {
    pool: SqlitePool,
}

impl SqliteGenerationInputRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationInputRepository for SqliteGenerationInputRepository {
    async fn save_batch_with_inputs(&self, batch: &GenerationInputBatch, inputs: &[GenerationInput]) -> Result<(), DocGenError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO generation_input_batches
             (id, document_id, template_version_id, version_intent, status, content_hash, total_inputs, is_immutable, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(batch.id.to_string())
        .bind(batch.document_id.to_string())
        .bind(batch.template_version_id.to_string())
        .bind(batch.version_intent)
        .bind(batch_status_str(batch.status))
        .bind(&batch.content_hash)
        .bind(batch.total_inputs)
        .bind(batch.is_immutable)
        .bind(batch.created_at.to_rfc3339())
        .bind(batch.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for input in inputs {
            let snapshot = serde_json::to_string(&input.snapshot)?;
            sqlx::query(
                "INSERT INTO generation_inputs (id, batch_id, section_id, sequence_order, snapshot, input_hash) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(input.id.to_string())
            .bind(input.batch_id.to_string())
            .bind(input.section_id.value())
            .bind(input.sequence_order)
            .bind(snapshot)
            .bind(&input.input_hash)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn validate_batch(&self, batch: &GenerationInputBatch) -> Result<(), DocGenError> {
        sqlx::query(
            "UPDATE generation_input_batches SET status = ?, content_hash = ?, total_inputs = ?, is_immutable = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(batch_status_str(batch.status))
        .bind(&batch.content_hash)
        .bind(batch.total_inputs)
        .bind(batch.is_immutable)
        .bind(batch.updated_at.to_rfc3339())
        .bind(batch.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_batch(&self, id: GenerationInputBatchId) -> Result<Option<GenerationInputBatch>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, document_id, template_version_id, version_intent, status, content_hash, total_inputs, is_immutable, created_at, updated_at
             FROM generation_input_batches WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_batch).transpose()
    }

    async fn find_inputs_for_batch(&self, batch_id: GenerationInputBatchId) -> Result<Vec<GenerationInput>, DocGenError> {
        let rows = sqlx::query("SELECT id, batch_id, section_id, sequence_order, snapshot, input_hash FROM generation_inputs WHERE batch_id = ? ORDER BY sequence_order ASC")
            .bind(batch_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|r| {
                let snapshot_raw: String = r.try_get("snapshot")?;
                Ok(GenerationInput {
                    id: GenerationInputId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
                    batch_id: GenerationInputBatchId::from_str(r.try_get::<String, _>("batch_id")?.as_str())
                        .map_err(|e| DocGenError::internal(e.to_string()))?,
                    section_id: SectionId::new(r.try_get("section_id")?),
                    sequence_order: r.try_get("sequence_order")?,
                    snapshot: serde_json::from_str::<GenerationInputSnapshot>(&snapshot_raw)?,
                    input_hash: r.try_get("input_hash")?,
                })
            })
            .collect()
    }
}

fn row_to_batch(r: sqlx::sqlite::SqliteRow) -> Result<GenerationInputBatch, DocGenError> {
    Ok(GenerationInputBatch {
        id: GenerationInputBatchId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        document_id: DocumentId::from_str(r.try_get::<String, _>("document_id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        template_version_id: TemplateVersionId::from_str(r.try_get::<String, _>("template_version_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        version_intent: r.try_get("version_intent")?,
        status: batch_status_from_str(&r.try_get::<String, _>("status")?)?,
        content_hash: r.try_get("content_hash")?,
        total_inputs: r.try_get("total_inputs")?,
        is_immutable: r.try_get("is_immutable")?,
        created_at: parse_timestamp(&r, "created_at")?,
        updated_at: parse_timestamp(&r, "updated_at")?,
    })
}

fn batch_status_str(s: BatchStatus) -> &'static str {
    match s {
        BatchStatus::Pending => "PENDING",
        BatchStatus::Validated => "VALIDATED",
        BatchStatus::Failed => "FAILED",
    }
}

fn batch_status_from_str(s: &str) -> Result<BatchStatus, DocGenError> {
    match s {
        "PENDING" => Ok(BatchStatus::Pending),
        "VALIDATED" => Ok(BatchStatus::Validated),
        "FAILED" => Ok(BatchStatus::Failed),
        other => Err(DocGenError::internal(format!("unrecognized batch status: {other}"))),
    }
}
