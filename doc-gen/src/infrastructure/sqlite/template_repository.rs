// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;
use doc_gen_domain::entities::{Template, TemplateVersion};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::{TemplateRepository, TemplateVersionRepository};
use doc_gen_domain::value_objects::{ParsingStatus, TemplateId, TemplateVersionId};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteTemplateRepository {
    pool: SqlitePool,
}

impl SqliteTemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn save(&self, template: &Template) -> Result<(), DocGenError> {
        sqlx::query("INSERT INTO templates (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(template.id.to_string())
            .bind(&template.name)
            .bind(template.created_at.to_rfc3339())
            .bind(template.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: TemplateId) -> Result<Option<Template>, DocGenError> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM templates WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            Ok(Template {
                id: TemplateId::from_str(r.try_get::<String, _>("id")?.as_str())
                    .map_err(|e| DocGenError::internal(e.to_string()))?,
                name: r.try_get("name")?,
                created_at: parse_timestamp(&r, "created_at")?,
                updated_at: parse_timestamp(&r, "updated_at")?,
            })
        })
        .transpose()
    }
}

pub struct SqliteTemplateVersionRepository {
    pool: SqlitePool,
}

impl SqliteTemplateVersionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateVersionRepository for SqliteTemplateVersionRepository {
    async fn save(&self, version: &TemplateVersion) -> Result<(), DocGenError> {
        sqlx::query(
            "INSERT INTO template_versions
             (id, template_id, version_number, source_path, parsed_path, parsing_status, content_hash, parsing_error, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(version.id.to_string())
        .bind(version.template_id.to_string())
        .bind(version.version_number)
        .bind(&version.source_path)
        .bind(&version.parsed_path)
        .bind(parsing_status_str(version.parsing_status))
        .bind(&version.content_hash)
        .bind(&version.parsing_error)
        .bind(version.created_at.to_rfc3339())
        .bind(version.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, version: &TemplateVersion) -> Result<(), DocGenError> {
        sqlx::query(
            "UPDATE template_versions SET parsed_path = ?, parsing_status = ?, content_hash = ?, parsing_error = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&version.parsed_path)
        .bind(parsing_status_str(version.parsing_status))
        .bind(&version.content_hash)
        .bind(&version.parsing_error)
        .bind(version.updated_at.to_rfc3339())
        .bind(version.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: TemplateVersionId) -> Result<Option<TemplateVersion>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, template_id, version_number, source_path, parsed_path, parsing_status, content_hash, parsing_error, created_at, updated_at
             FROM template_versions WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_template_version).transpose()
    }

    async fn next_version_number(&self, template_id: TemplateId) -> Result<i64, DocGenError> {
        let row = sqlx::query("SELECT COALESCE(MAX(version_number), 0) AS max_version FROM template_versions WHERE template_id = ?")
            .bind(template_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        let max: i64 = row.try_get("max_version")?;
        Ok(max + 1)
    }
}

fn row_to_template_version(r: sqlx::sqlite::SqliteRow) -> Result<TemplateVersion, DocGenError> {
    Ok(TemplateVersion {
        id: TemplateVersionId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        template_id: TemplateId::from_str(r.try_get::<String, _>("template_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        version_number: r.try_get("version_number")?,
        source_path: r.try_get("source_path")?,
        parsed_path: r.try_get("parsed_path")?,
        parsing_status: parsing_status_from_str(&r.try_get::<String, _>("parsing_status")?)?,
        content_hash: r.try_get("content_hash")?,
        parsing_error: r.try_get("parsing_error")?,
        created_at: parse_timestamp(&r, "created_at")?,
        updated_at: parse_timestamp(&r, "updated_at")?,
    })
}

fn parsing_status_str(status: ParsingStatus) -> &'static str {
    match status {
        ParsingStatus::Pending => "PENDING",
        ParsingStatus::InProgress => "IN_PROGRESS",
        ParsingStatus::Completed => "COMPLETED",
        ParsingStatus::Failed => "FAILED",
    }
}

fn parsing_status_from_str(s: &str) -> Result<ParsingStatus, DocGenError> {
    match s {
        "PENDING" => Ok(ParsingStatus::Pending),
        "IN_PROGRESS" => Ok(ParsingStatus::InProgress),
        "COMPLETED" => Ok(ParsingStatus::Completed),
        "FAILED" => Ok(ParsingStatus::Failed),
        other => Err(DocGenError::internal(format!("unrecognized parsing_status: {other}"))),
    }
}

pub(crate) fn parse_timestamp(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<chrono::DateTime<chrono::Utc>, DocGenError> {
    let raw: String = row.try_get(column)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| DocGenError::internal(format!("malformed timestamp in column {column}: {e}")))
}
