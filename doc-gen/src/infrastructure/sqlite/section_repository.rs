// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use async_trait::async_trait;
use doc_gen_domain::entities::Section;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::SectionRepository;
use doc_gen_domain::value_objects::{SectionId, SectionType, TemplateVersionId};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteSectionRepository {
    pool: SqlitePool,
}

impl SqliteSectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SectionRepository for SqliteSectionRepository {
    async fn save_all(&self, sections: &mut [Section]) -> Result<(), DocGenError> {
        let mut tx = self.pool.begin().await?;
        for section in sections.iter_mut() {
            let prompt_config = section.prompt_config.as_ref().map(|v| v.to_string());
            let result = sqlx::query(
                "INSERT INTO sections (template_version_id, section_type, structural_path, prompt_config) VALUES (?, ?, ?, ?)",
            )
            .bind(section.template_version_id.to_string())
            .bind(section_type_str(section.section_type))
            .bind(&section.structural_path)
            .bind(prompt_config)
            .execute(&mut *tx)
            .await?;
            section.id = SectionId::new(result.last_insert_rowid());
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_by_template_version(&self, template_version_id: TemplateVersionId) -> Result<Vec<Section>, DocGenError> {
        let rows = sqlx::query(
            "SELECT id, template_version_id, section_type, structural_path, prompt_config FROM sections
             WHERE template_version_id = ? ORDER BY id ASC",
        )
        .bind(template_version_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_section).collect()
    }

    async fn find_dynamic_ordered(&self, template_version_id: TemplateVersionId) -> Result<Vec<Section>, DocGenError> {
        let rows = sqlx::query(
            "SELECT id, template_version_id, section_type, structural_path, prompt_config FROM sections
             WHERE template_version_id = ? AND section_type = 'DYNAMIC' ORDER BY id ASC, structural_path ASC",
        )
        .bind(template_version_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_section).collect()
    }
}

fn row_to_section(r: sqlx::sqlite::SqliteRow) -> Result<Section, DocGenError> {
    let id: i64 = r.try_get("id")?;
    let prompt_config: Option<String> = r.try_get("prompt_config")?;
    Ok(Section {
        id: SectionId::new(id),
        template_version_id: TemplateVersionId::from_str(r.try_get::<String, _>("template_version_id")?.as_str())
            .map_err(|e| DocGenError::internal(e.to_string()))?,
        section_type: section_type_from_str(&r.try_get::<String, _>("section_type")?)?,
        structural_path: r.try_get("structural_path")?,
        prompt_config: prompt_config.map(|s| serde_json::from_str(&s)).transpose()?,
    })
}

fn section_type_str(t: SectionType) -> &'static str {
    match t {
        SectionType::Static => "STATIC",
        SectionType::Dynamic => "DYNAMIC",
    }
}

fn section_type_from_str(s: &str) -> Result<SectionType, DocGenError> {
    match s {
        "STATIC" => Ok(SectionType::Static),
        "DYNAMIC" => Ok(SectionType::Dynamic),
        other => Err(DocGenError::internal(format!("unrecognized section_type: {other}"))),
    }
}
