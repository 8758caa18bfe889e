// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Job queue persistence contract, grounded on
//! `original_source/backend/app/domains/job/repository.py`. The atomic-claim
//! primitive is the one operation in this crate whose correctness is a hard
//! concurrency requirement (spec §4.2, §5, §8 invariant 3): two simultaneous
//! claimers must never observe the same PENDING job.

use crate::entities::{Job, JobPayload};
use crate::error::DocGenError;
use crate::value_objects::{JobId, JobType};
use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts a PENDING row. The caller is responsible for any pub/sub
    /// wake-up notification (spec §4.2 `enqueue`); that is a coordination
    /// concern, not a persistence one.
    async fn enqueue(&self, payload: &JobPayload) -> Result<JobId, DocGenError>;

    /// Atomically selects the oldest PENDING job (optionally filtered by
    /// type), transitions it to RUNNING, and stamps `worker_id` +
    /// `started_at`, all within one transaction equivalent to row-level
    /// `SELECT … FOR UPDATE SKIP LOCKED` (spec §4.2, §5). Must return `None`
    /// rather than block when no matching job is available.
    async fn claim(&self, worker_id: &str, type_filter: Option<JobType>) -> Result<Option<Job>, DocGenError>;

    async fn complete(&self, job_id: JobId, result: Value) -> Result<(), DocGenError>;

    /// Completes `job_id` and, when `advance` is `Some`, enqueues the
    /// successor payload in the same transaction (spec §4.2 "the
    /// advancement step is part of the same transaction as the completion
    /// of the predecessor job"). Returns the successor's id, if enqueued.
    async fn complete_and_advance(&self, job_id: JobId, result: Value, advance: Option<JobPayload>) -> Result<Option<JobId>, DocGenError> {
        self.complete(job_id, result).await?;
        match advance {
            Some(payload) => self.enqueue(&payload).await.map(Some),
            None => Ok(None),
        }
    }

    async fn fail(&self, job_id: JobId, error: &str) -> Result<(), DocGenError>;

    /// Returns `false` if the job was already terminal (spec §4.2 `cancel`).
    async fn cancel(&self, job_id: JobId) -> Result<bool, DocGenError>;

    async fn find_by_id(&self, job_id: JobId) -> Result<Option<Job>, DocGenError>;

    /// RUNNING jobs whose `started_at` is older than `threshold` (spec §4.2
    /// `find-stuck`).
    async fn find_stuck(&self, threshold: Duration) -> Result<Vec<Job>, DocGenError>;

    /// RUNNING → PENDING, clearing `worker_id`/`started_at` and recording
    /// `reason` (spec §4.2 `reset-stuck`). Implementations must serialise
    /// concurrent recovery attempts for the same job so at most one caller
    /// observes success (spec §8 invariant 9) — the named-lock coordination
    /// that makes this process-wide lives in `CoordinationStore`, but the
    /// repository itself must still be safe under concurrent callers that
    /// skipped the lock.
    async fn reset_stuck(&self, job_id: JobId, reason: &str) -> Result<(), DocGenError>;
}
