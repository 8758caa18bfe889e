// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;
use doc_gen_domain::entities::Document;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::DocumentRepository;
use doc_gen_domain::value_objects::{DocumentId, TemplateVersionId};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteDocumentRepository {
    pool: SqlitePool,
}

impl SqliteDocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for SqliteDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocGenError> {
        sqlx::query("INSERT INTO documents (id, template_version_id, current_version) VALUES (?, ?, ?)")
            .bind(document.id.to_string())
            .bind(document.template_version_id.to_string())
            .bind(document.current_version)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, document: &Document) -> Result<(), DocGenError> {
        sqlx::query("UPDATE documents SET current_version = ? WHERE id = ?")
            .bind(document.current_version)
            .bind(document.id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Document>, DocGenError> {
        let row = sqlx::query("SELECT id, template_version_id, current_version FROM documents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            Ok(Document {
                id: DocumentId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
                template_version_id: TemplateVersionId::from_str(r.try_get::<String, _>("template_version_id")?.as_str())
                    .map_err(|e| DocGenError::internal(e.to_string()))?,
                current_version: r.try_get("current_version")?,
            })
        })
        .transpose()
    }
}
