// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Job queue persistence, grounded on
//! `original_source/backend/app/domains/job/repository.py`'s atomic-claim
//! semantics. `claim` starts a `BEGIN IMMEDIATE` transaction — SQLite grabs
//! the write lock up front rather than on first write, so two connections
//! racing to claim the same oldest-PENDING job serialise instead of both
//! reading a row they then both try to update (spec §4.2, §5, §8 invariant
//! 3). The loser's `BEGIN IMMEDIATE` blocks until the winner commits, then
//! re-reads and finds the row already RUNNING.

use crate::infrastructure::sqlite::template_repository::parse_timestamp;
use async_trait::async_trait;
use doc_gen_domain::entities::{Job, JobPayload};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::JobRepository;
use doc_gen_domain::value_objects::{JobId, JobStatus, JobType};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn enqueue(&self, payload: &JobPayload) -> Result<JobId, DocGenError> {
        let job = Job::new_pending(payload);
        sqlx::query(
            "INSERT INTO jobs (id, job_type, status, payload, worker_id, started_at, completed_at, result, error, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(job.id.to_string())
        .bind(job_type_str(job.job_type))
        .bind(job_status_str(job.status))
        .bind(job.payload.to_string())
        .bind(&job.worker_id)
        .bind(job.started_at.map(|t| t.to_rfc3339()))
        .bind(job.completed_at.map(|t| t.to_rfc3339()))
        .bind(job.result.as_ref().map(|v| v.to_string()))
        .bind(&job.error)
        .bind(job.created_at.to_rfc3339())
        .bind(job.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(job.id)
    }

    async fn claim(&self, worker_id: &str, type_filter: Option<JobType>) -> Result<Option<Job>, DocGenError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let row = match type_filter {
            Some(job_type) => {
                sqlx::query("SELECT id FROM jobs WHERE status = 'PENDING' AND job_type = ? ORDER BY created_at ASC LIMIT 1")
                    .bind(job_type_str(job_type))
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => {
                sqlx::query("SELECT id FROM jobs WHERE status = 'PENDING' ORDER BY created_at ASC LIMIT 1")
                    .fetch_optional(&mut *tx)
                    .await?
            }
        };

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let id: String = row.try_get("id")?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("UPDATE jobs SET status = 'RUNNING', worker_id = ?, started_at = ?, updated_at = ? WHERE id = ?")
            .bind(worker_id)
            .bind(&now)
            .bind(&now)
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            "SELECT id, job_type, status, payload, worker_id, started_at, completed_at, result, error, created_at, updated_at FROM jobs WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;
        let job = row_to_job(row)?;

        tx.commit().await?;
        Ok(Some(job))
    }

    async fn complete(&self, job_id: JobId, result: serde_json::Value) -> Result<(), DocGenError> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE jobs SET status = 'COMPLETED', result = ?, completed_at = ?, updated_at = ?
             WHERE id = ? AND status NOT IN ('COMPLETED', 'FAILED')",
        )
        .bind(result.to_string())
        .bind(&now)
        .bind(&now)
        .bind(job_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn complete_and_advance(&self, job_id: JobId, result: serde_json::Value, advance: Option<JobPayload>) -> Result<Option<JobId>, DocGenError> {
        let mut tx = self.pool.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE jobs SET status = 'COMPLETED', result = ?, completed_at = ?, updated_at = ?
             WHERE id = ? AND status NOT IN ('COMPLETED', 'FAILED')",
        )
        .bind(result.to_string())
        .bind(&now)
        .bind(&now)
        .bind(job_id.to_string())
        .execute(&mut *tx)
        .await?;

        let advanced_id = match advance {
            Some(payload) => {
                let successor = Job::new_pending(&payload);
                sqlx::query(
                    "INSERT INTO jobs (id, job_type, status, payload, worker_id, started_at, completed_at, result, error, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(successor.id.to_string())
                .bind(job_type_str(successor.job_type))
                .bind(job_status_str(successor.status))
                .bind(successor.payload.to_string())
                .bind(&successor.worker_id)
                .bind(successor.started_at.map(|t| t.to_rfc3339()))
                .bind(successor.completed_at.map(|t| t.to_rfc3339()))
                .bind(successor.result.as_ref().map(|v| v.to_string()))
                .bind(&successor.error)
                .bind(successor.created_at.to_rfc3339())
                .bind(successor.updated_at.to_rfc3339())
                .execute(&mut *tx)
                .await?;
                Some(successor.id)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(advanced_id)
    }

    async fn fail(&self, job_id: JobId, error: &str) -> Result<(), DocGenError> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE jobs SET status = 'FAILED', error = ?, completed_at = ?, updated_at = ?
             WHERE id = ? AND status NOT IN ('COMPLETED', 'FAILED')",
        )
        .bind(error)
        .bind(&now)
        .bind(&now)
        .bind(job_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn cancel(&self, job_id: JobId) -> Result<bool, DocGenError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE jobs SET status = 'FAILED', error = 'Cancelled by user', completed_at = ?, updated_at = ?
             WHERE id = ? AND status NOT IN ('COMPLETED', 'FAILED')",
        )
        .bind(&now)
        .bind(&now)
        .bind(job_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, job_id: JobId) -> Result<Option<Job>, DocGenError> {
        let row = sqlx::query(
            "SELECT id, job_type, status, payload, worker_id, started_at, completed_at, result, error, created_at, updated_at FROM jobs WHERE id = ?",
        )
        .bind(job_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(row_to_job).transpose()
    }

    async fn find_stuck(&self, threshold: chrono::Duration) -> Result<Vec<Job>, DocGenError> {
        let cutoff = (chrono::Utc::now() - threshold).to_rfc3339();
        let rows = sqlx::query(
            "SELECT id, job_type, status, payload, worker_id, started_at, completed_at, result, error, created_at, updated_at
             FROM jobs WHERE status = 'RUNNING' AND started_at <= ?",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(row_to_job).collect()
    }

    async fn reset_stuck(&self, job_id: JobId, reason: &str) -> Result<(), DocGenError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE jobs SET status = 'PENDING', worker_id = NULL, started_at = NULL, error = ?, updated_at = ?
             WHERE id = ? AND status = 'RUNNING'",
        )
        .bind(reason)
        .bind(&now)
        .bind(job_id.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DocGenError::Job(format!("job {job_id} is not RUNNING, cannot reset")));
        }
        Ok(())
    }
}

fn row_to_job(r: sqlx::sqlite::SqliteRow) -> Result<Job, DocGenError> {
    let payload_raw: String = r.try_get("payload")?;
    let result_raw: Option<String> = r.try_get("result")?;
    Ok(Job {
        id: JobId::from_str(r.try_get::<String, _>("id")?.as_str()).map_err(|e| DocGenError::internal(e.to_string()))?,
        job_type: job_type_from_str(&r.try_get::<String, _>("job_type")?)?,
        status: job_status_from_str(&r.try_get::<String, _>("status")?)?,
        payload: serde_json::from_str(&payload_raw)?,
        worker_id: r.try_get("worker_id")?,
        started_at: optional_timestamp(&r, "started_at")?,
        completed_at: optional_timestamp(&r, "completed_at")?,
        result: result_raw.map(|s| serde_json::from_str(&s)).transpose()?,
        error: r.try_get("error")?,
        created_at: parse_timestamp(&r, "created_at")?,
        updated_at: parse_timestamp(&r, "updated_at")?,
    })
}

fn optional_timestamp(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<Option<chrono::DateTime<chrono::Utc>>, DocGenError> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| {
        chrono::DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| DocGenError::internal(format!("malformed timestamp in column {column}: {e}")))
    })
    .transpose()
}

fn job_type_str(t: JobType) -> &'static str {
    match t {
        JobType::Parse => "PARSE",
        JobType::Classify => "CLASSIFY",
        JobType::Generate => "GENERATE",
        JobType::Regenerate => "REGENERATE",
        JobType::RegenerateSections => "REGENERATE_SECTIONS",
    }
}

fn job_type_from_str(s: &str) -> Result<JobType, DocGenError> {
    match s {
        "PARSE" => Ok(JobType::Parse),
        "CLASSIFY" => Ok(JobType::Classify),
        "GENERATE" => Ok(JobType::Generate),
        "REGENERATE" => Ok(JobType::Regenerate),
        "REGENERATE_SECTIONS" => Ok(JobType::RegenerateSections),
        other => Err(DocGenError::internal(format!("unrecognized job_type: {other}"))),
    }
}

fn job_status_str(s: JobStatus) -> &'static str {
    match s {
        JobStatus::Pending => "PENDING",
        JobStatus::Running => "RUNNING",
        JobStatus::Completed => "COMPLETED",
        JobStatus::Failed => "FAILED",
    }
}

fn job_status_from_str(s: &str) -> Result<JobStatus, DocGenError> {
    match s {
        "PENDING" => Ok(JobStatus::Pending),
        "RUNNING" => Ok(JobStatus::Running),
        "COMPLETED" => Ok(JobStatus::Completed),
        "FAILED" => Ok(JobStatus::Failed),
        other => Err(DocGenError::internal(format!("unrecognized job status: {other}"))),
    }
}
