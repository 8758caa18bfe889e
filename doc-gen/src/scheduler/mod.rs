// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Job-queue worker (spec §4.2, §5): three cooperating tokio tasks sharing
//! one `CancellationToken` — job polling, liveness heartbeat, and stuck-job
//! recovery — grounded on the teacher's `infrastructure/runtime::supervisor`
//! spawn/join pattern plus its `shutdown::ShutdownCoordinator`.

pub mod job_handlers;

use crate::config::{CoordinationConfig, SchedulerConfig};
use crate::infrastructure::runtime::shutdown::CancellationToken;
use crate::infrastructure::runtime::supervisor::{join_supervised, spawn_supervised};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::JobRepository;
use doc_gen_domain::services::{CoordinationStore, MetricsRecorder};
use job_handlers::JobHandlers;
use std::sync::Arc;
use std::time::Duration;

const RECOVERY_LOCK_NAME: &str = "stuck-job-recovery";

pub struct Worker {
    pub worker_id: String,
    pub job_repository: Arc<dyn JobRepository>,
    pub handlers: Arc<JobHandlers>,
    pub coordination: Arc<dyn CoordinationStore>,
    pub metrics: Arc<dyn MetricsRecorder>,
    pub scheduler: SchedulerConfig,
    pub coordination_config: CoordinationConfig,
}

impl Worker {
    /// Spawns the three cooperating loops and blocks until `token` is
    /// cancelled and all three have drained (spec §4.2: no loop stops
    /// mid-iteration, each finishes its current pass before exiting).
    pub async fn run(self: Arc<Self>, token: CancellationToken) -> Result<(), DocGenError> {
        let poll = spawn_supervised("job-poll", {
            let worker = self.clone();
            let token = token.clone();
            async move { worker.poll_loop(token).await }
        });
        let heartbeat = spawn_supervised("heartbeat", {
            let worker = self.clone();
            let token = token.clone();
            async move { worker.heartbeat_loop(token).await }
        });
        let recovery = spawn_supervised("stuck-job-recovery", {
            let worker = self.clone();
            async move { worker.recovery_loop(token).await }
        });

        join_supervised(poll).await?;
        join_supervised(heartbeat).await?;
        join_supervised(recovery).await?;
        Ok(())
    }

    async fn poll_loop(&self, token: CancellationToken) -> Result<(), DocGenError> {
        let interval = Duration::from_secs(self.scheduler.poll_interval_secs);
        loop {
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                claimed = self.job_repository.claim(&self.worker_id, None) => {
                    match claimed? {
                        Some(job) => self.execute(job).await,
                        None => tokio::time::sleep(interval).await,
                    }
                }
            }
        }
    }

    async fn execute(&self, job: doc_gen_domain::entities::Job) {
        let job_type = job.job_type.clone();
        let type_label = format!("{job_type:?}").to_uppercase();
        self.metrics.job_claimed(&type_label);

        let outcome = match job.decode_payload() {
            Ok(payload) => self.handlers.run(&payload).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok((result, advance)) => {
                if let Err(e) = self.job_repository.complete_and_advance(job.id, result, advance).await {
                    tracing::error!(job_id = %job.id, error = %e, "failed to record job completion");
                }
                self.metrics.job_completed(&type_label);
            }
            Err(e) => {
                if let Err(persist_err) = self.job_repository.fail(job.id, &e.to_string()).await {
                    tracing::error!(job_id = %job.id, error = %persist_err, "failed to record job failure");
                }
                self.metrics.job_failed(&type_label, e.category());
            }
        }
    }

    async fn heartbeat_loop(&self, token: CancellationToken) -> Result<(), DocGenError> {
        let interval = Duration::from_secs(self.coordination_config.heartbeat_interval_secs);
        let ttl = Duration::from_secs(self.coordination_config.heartbeat_ttl_secs);
        loop {
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                _ = tokio::time::sleep(interval) => {
                    self.coordination.heartbeat(&self.worker_id, ttl).await;
                }
            }
        }
    }

    async fn recovery_loop(&self, token: CancellationToken) -> Result<(), DocGenError> {
        let interval = Duration::from_secs(self.scheduler.recovery_interval_secs);
        let threshold = chrono::Duration::seconds(self.scheduler.stuck_threshold_secs as i64);
        let lock_ttl = Duration::from_secs(self.coordination_config.recovery_lock_ttl_secs);
        loop {
            tokio::select! {
                _ = token.cancelled() => return Ok(()),
                _ = tokio::time::sleep(interval) => {
                    self.recover_stuck_jobs(threshold, lock_ttl).await?;
                }
            }
        }
    }

    async fn recover_stuck_jobs(&self, threshold: chrono::Duration, lock_ttl: Duration) -> Result<(), DocGenError> {
        let Some(token) = self.coordination.try_acquire_lock(RECOVERY_LOCK_NAME, lock_ttl).await else {
            return Ok(());
        };

        let stuck = self.job_repository.find_stuck(threshold).await?;
        for job in &stuck {
            if let Err(e) = self.job_repository.reset_stuck(job.id, "stuck job recovery").await {
                tracing::warn!(job_id = %job.id, error = %e, "failed to reset stuck job");
            }
        }
        if !stuck.is_empty() {
            tracing::info!(count = stuck.len(), "recovered stuck jobs");
        }

        self.coordination.release_lock(RECOVERY_LOCK_NAME, &token).await;
        Ok(())
    }
}
