// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::error::DocGenError;
use crate::value_objects::{HashHex, ParsingStatus, TemplateId, TemplateVersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version numbers are dense per template (≥1). Once `COMPLETED`,
/// `parsed_path` and `content_hash` are immutable (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVersion {
    pub id: TemplateVersionId,
    pub template_id: TemplateId,
    pub version_number: i64,
    pub source_path: String,
    pub parsed_path: Option<String>,
    pub parsing_status: ParsingStatus,
    pub content_hash: Option<HashHex>,
    pub parsing_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateVersion {
    pub fn new(template_id: TemplateId, version_number: i64, source_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateVersionId::new(),
            template_id,
            version_number,
            source_path: source_path.into(),
            parsed_path: None,
            parsing_status: ParsingStatus::Pending,
            content_hash: None,
            parsing_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_in_progress(&mut self) -> Result<(), DocGenError> {
        if self.parsing_status == ParsingStatus::Completed {
            return Err(DocGenError::immutability_violation(
                "TemplateVersion",
                self.id.to_string(),
                "re-parse after completion",
            ));
        }
        self.parsing_status = ParsingStatus::InProgress;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition to `COMPLETED`, freezing `parsed_path` and `content_hash`.
    pub fn mark_completed(&mut self, parsed_path: impl Into<String>, content_hash: HashHex) -> Result<(), DocGenError> {
        if self.parsing_status == ParsingStatus::Completed {
            return Err(DocGenError::immutability_violation(
                "TemplateVersion",
                self.id.to_string(),
                "overwrite completed parse result",
            ));
        }
        self.parsed_path = Some(parsed_path.into());
        self.content_hash = Some(content_hash);
        self.parsing_status = ParsingStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), DocGenError> {
        if self.parsing_status == ParsingStatus::Completed {
            return Err(DocGenError::immutability_violation(
                "TemplateVersion",
                self.id.to_string(),
                "fail a completed parse",
            ));
        }
        self.parsing_status = ParsingStatus::Failed;
        self.parsing_error = Some(error.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_parsed(&self) -> bool {
        self.parsing_status == ParsingStatus::Completed && self.parsed_path.is_some()
    }
}
