// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::error::DocGenError;
use crate::value_objects::{DocumentId, JobId, JobStatus, JobType, SectionId, TemplateVersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Narrow, typed payload per job type (spec §6, §9 "Dynamic typing in
/// payloads" redesign note): decoded once at claim time rather than passed
/// around as a schemaless map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "job_type", rename_all = "UPPERCASE")]
pub enum JobPayload {
    Parse {
        template_version_id: TemplateVersionId,
    },
    Classify {
        template_version_id: TemplateVersionId,
    },
    Generate {
        template_version_id: TemplateVersionId,
        document_id: DocumentId,
        #[serde(default)]
        version_intent: Option<i64>,
        #[serde(default)]
        client_data: Option<Value>,
    },
    Regenerate {
        document_id: DocumentId,
        version_intent: i64,
        #[serde(default)]
        client_data: Option<Value>,
        #[serde(default)]
        correlation_id: Option<String>,
    },
    RegenerateSections {
        document_id: DocumentId,
        #[serde(default)]
        template_version_id: Option<TemplateVersionId>,
        version_intent: i64,
        section_ids: Vec<SectionId>,
        #[serde(default)]
        reuse_section_ids: Vec<SectionId>,
        #[serde(default)]
        client_data: Option<Value>,
        #[serde(default)]
        correlation_id: Option<String>,
    },
}

impl JobPayload {
    pub fn job_type(&self) -> JobType {
        match self {
            JobPayload::Parse { .. } => JobType::Parse,
            JobPayload::Classify { .. } => JobType::Classify,
            JobPayload::Generate { .. } => JobType::Generate,
            JobPayload::Regenerate { .. } => JobType::Regenerate,
            JobPayload::RegenerateSections { .. } => JobType::RegenerateSections,
        }
    }
}

/// Terminal states (COMPLETED, FAILED) are sinks; RUNNING → PENDING only via
/// stuck-job recovery (spec §3, §4.2 state machine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_type: JobType,
    pub status: JobStatus,
    pub payload: Value,
    pub worker_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new_pending(payload: &JobPayload) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            job_type: payload.job_type(),
            status: JobStatus::Pending,
            payload: serde_json::to_value(payload).expect("JobPayload always serializes"),
            worker_id: None,
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn decode_payload(&self) -> Result<JobPayload, DocGenError> {
        serde_json::from_value(self.payload.clone()).map_err(DocGenError::from)
    }

    /// PENDING → RUNNING, stamping worker identity and start time. Callers
    /// (the repository) are responsible for the atomic claim semantics
    /// (spec §4.2, §5) — this only enforces the state-machine transition.
    pub fn claim(&mut self, worker_id: impl Into<String>) -> Result<(), DocGenError> {
        if self.status != JobStatus::Pending {
            return Err(DocGenError::Job(format!(
                "job {} cannot be claimed from status {:?}",
                self.id, self.status
            )));
        }
        self.status = JobStatus::Running;
        self.worker_id = Some(worker_id.into());
        self.started_at = Some(Utc::now());
        self.updated_at = self.started_at.unwrap();
        Ok(())
    }

    /// Terminal-write-is-no-op per spec §5: completing an already-terminal
    /// job is silently accepted rather than erroring, since a cancelled or
    /// recovered job's original handler may still try to write its result.
    pub fn complete(&mut self, result: Value) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Completed;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
        self.updated_at = self.completed_at.unwrap();
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        self.updated_at = self.completed_at.unwrap();
    }

    /// PENDING|RUNNING → FAILED with a fixed error message; terminal jobs
    /// cannot be cancelled (spec §4.2).
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.error = Some("Cancelled by user".to_string());
        self.completed_at = Some(Utc::now());
        self.updated_at = self.completed_at.unwrap();
        true
    }

    /// RUNNING → PENDING, clearing worker identity and start time (spec
    /// §4.2 `reset-stuck`).
    pub fn reset_stuck(&mut self, reason: impl Into<String>) -> Result<(), DocGenError> {
        if self.status != JobStatus::Running {
            return Err(DocGenError::Job(format!(
                "job {} cannot be reset from status {:?}",
                self.id, self.status
            )));
        }
        self.status = JobStatus::Pending;
        self.worker_id = None;
        self.started_at = None;
        self.error = Some(reason.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_stuck(&self, now: DateTime<Utc>, threshold: chrono::Duration) -> bool {
        self.status == JobStatus::Running
            && self.started_at.map(|started| now - started >= threshold).unwrap_or(false)
    }
}
