// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::infrastructure::sqlite::template_repository::parse_timestamp;
use async_trait::async_trait;
use doc_gen_domain::entities::{DocumentVersion, GenerationMetadata};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::DocumentVersionRepository;
use doc_gen_domain::value_objects::{DocumentId, DocumentVersionId, HashHex};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteDocumentVersionRepository {
    pool: SqlitePool,
}

impl SqliteDocumentVersionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentVersionRepository for SqliteDocumentVersionRepository {
    async fn save(&self, version: &DocumentVersion) -> Result<(), DocGenError> {
        let result = sqlx::query(
            "INSERT INTO document_versions (id, document_id, version_number, output_path, content_hash, file_size_bytes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(version.id.to_string())
        .bind(version.document_id.to_string())
        .bind(version.version_number)
        .bind(&version.output_path)
        .bind(&version.generation_metadata.content_hash)
        .bind(version.generation_metadata.file_size_bytes)
        .bind(version.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DocGenError::Versioning {
                code: doc_gen_domain::value_objects::VersioningErrorCode::DuplicateVersion,
                message: format!(
                    "document {} already has a version {}",
                    version.document_id, version.version_number
                ),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_document(&self, document_id: DocumentId) -> Result<Vec<DocumentVersion>, DocGenError> {
        let rows = sqlx::query(
            "SELECT id, document_id, version_number, output_path, content_hash, file_size_bytes, created_at
             FROM document_versions WHERE document_id = ? ORDER BY version_number ASC",
        )
        .bind(document_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_document_version).collect()
    }

    async fn find_by_document_and_version(&self, document_id: DocumentId, version_number: i64) -> Result<Option<DocumentVersion>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, document_id, version_number, output_path, content_hash, file_size_bytes, created_at
             FROM document_versions WHERE document_id = ? AND version_number = ?",
        )
        .bind(document_id.to_string())
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_document_version).transpose()
    }

    async fn find_by_document_and_content_hash(&self, document_id: DocumentId, content_hash: &HashHex) -> Result<Option<DocumentVersion>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, document_id, version_number, output_path, content_hash, file_size_bytes, created_at
             FROM document_versions WHERE document_id = ? AND content_hash = ? ORDER BY version_number ASC LIMIT 1",
        )
        .bind(document_id.to_string())
        .bind(content_hash)
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_document_version).transpose()
    }

    async fn max_version_number(&self, document_id: DocumentId) -> Result<i64, DocGenError> {
        let row = sqlx::query("SELECT COALESCE(MAX(version_number), 0) AS max_version FROM document_versions WHERE document_id = ?")
            .bind(document_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("max_version")?)
    }
}

fn row_to_document_version(r: sqlx::sqlite::SqliteRow) -> Result<DocumentVersion, DocGenError> {
    Ok(DocumentVersion {
        id: DocumentVersionId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        document_id: DocumentId::from_str(r.try_get::<String, _>("document_id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        version_number: r.try_get("version_number")?,
        output_path: r.try_get("output_path")?,
        generation_metadata: GenerationMetadata {
            content_hash: r.try_get("content_hash")?,
            file_size_bytes: r.try_get("file_size_bytes")?,
        },
        created_at: parse_timestamp(&r, "created_at")?,
    })
}
