// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! SQLite persistence, grounded on the teacher's
//! `infrastructure/repositories/sqlite_repository.rs`: one adapter struct per
//! aggregate, holding a shared `SqlitePool`, translating domain entities to
//! and from rows by hand rather than through a generic derive (spec §3's
//! entities carry enough nested/JSON structure that a blanket
//! `sqlx::FromRow` would hide more than it clarifies).
//!
//! SQLite's single-writer model stands in for the Postgres
//! `SELECT ... FOR UPDATE SKIP LOCKED` spec §4.2 describes: `claim` instead
//! runs inside a `BEGIN IMMEDIATE` transaction, which SQLite serialises at
//! the connection-pool level, giving the same "exactly one claimer" result
//! (spec §5 "SQLite emulation", §9 open question — Postgres would swap only
//! this one query for a real `SKIP LOCKED` clause).

pub mod assembled_document_repository;
pub mod audit_log_repository;
pub mod document_repository;
pub mod document_version_repository;
pub mod generation_input_repository;
pub mod job_repository;
pub mod section_output_repository;
pub mod section_repository;
pub mod template_repository;

pub use assembled_document_repository::{SqliteAssembledDocumentRepository, SqliteRenderedDocumentRepository};
pub use audit_log_repository::SqliteAuditLogRepository;
pub use document_repository::SqliteDocumentRepository;
pub use document_version_repository::SqliteDocumentVersionRepository;
pub use generation_input_repository::SqliteGenerationInputRepository;
pub use job_repository::SqliteJobRepository;
pub use section_output_repository::SqliteSectionOutputRepository;
pub use section_repository::SqliteSectionRepository;
pub use template_repository::{SqliteTemplateRepository, SqliteTemplateVersionRepository};

use doc_gen_domain::error::DocGenError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub async fn connect(dsn: &str, max_connections: u32) -> Result<SqlitePool, DocGenError> {
    let options = SqliteConnectOptions::from_str(dsn)
        .map_err(|e| DocGenError::InvalidConfiguration(format!("invalid database dsn: {e}")))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| DocGenError::Database(e.to_string()))?;

    Ok(pool)
}
