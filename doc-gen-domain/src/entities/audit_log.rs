// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::AuditLogId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditEntityType {
    Template,
    TemplateVersion,
    Document,
    DocumentVersion,
    Section,
    Job,
    GenerationBatch,
    SectionOutput,
    SectionOutputBatch,
    AssembledDocument,
    RenderedDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    UpdateCurrentVersion,
    GenerationInitiated,
    SectionGenerationCompleted,
    SectionGenerationFailed,
    BatchGenerationCompleted,
    BatchGenerationFailed,
    DocumentAssemblyCompleted,
    DocumentAssemblyFailed,
    DocumentRenderingCompleted,
    DocumentRenderingFailed,
    DocumentVersionCreated,
}

/// Append-only; fields immutable after write; IDs unique (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub entity_type: AuditEntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub metadata: Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(entity_type: AuditEntityType, entity_id: impl Into<String>, action: AuditAction, metadata: Value) -> Self {
        Self {
            id: AuditLogId::new(),
            entity_type,
            entity_id: entity_id.into(),
            action,
            metadata,
            timestamp: Utc::now(),
        }
    }
}
