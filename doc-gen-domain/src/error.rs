// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A hierarchical error type for the document generation domain, grounded on
//! the error-category taxonomy of spec §7: input validation, immutability
//! violations, assembly errors, versioning errors, and job errors all reduce
//! to one `DocGenError` at the boundary where a pipeline stage reports its
//! result, while stage-local code still matches on the narrower
//! `AssemblyErrorCode` / `VersioningErrorCode` enums internally.

use thiserror::Error;

/// Domain-wide error type. Each variant names an error category from the
/// specification rather than a generic message, so callers can match on
/// category without parsing strings.
#[derive(Error, Debug, Clone)]
pub enum DocGenError {
    #[error("no dynamic sections for template version {0}")]
    NoDynamicSections(String),

    #[error("missing prompt config for section {section_id}: {reason}")]
    MissingPromptConfig { section_id: i64, reason: String },

    #[error("malformed section metadata for section {section_id}: {reason}")]
    MalformedSectionMetadata { section_id: i64, reason: String },

    #[error("input validation failed for section {section_id}, field '{field}': {reason} (value: {invalid_value})")]
    InputValidation {
        field: String,
        reason: String,
        section_id: i64,
        invalid_value: String,
    },

    #[error("immutability violation: {entity} {id} is immutable, attempted {attempted_action}")]
    ImmutabilityViolation {
        entity: String,
        id: String,
        attempted_action: String,
    },

    #[error("assembly error {code:?}: {message}")]
    Assembly {
        code: crate::value_objects::assembly_error::AssemblyErrorCode,
        message: String,
    },

    #[error("versioning error {code:?}: {message}")]
    Versioning {
        code: crate::value_objects::versioning_error::VersioningErrorCode,
        message: String,
    },

    #[error("job error: {0}")]
    Job(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DocGenError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn immutability_violation(
        entity: impl Into<String>,
        id: impl Into<String>,
        attempted_action: impl Into<String>,
    ) -> Self {
        Self::ImmutabilityViolation {
            entity: entity.into(),
            id: id.into(),
            attempted_action: attempted_action.into(),
        }
    }

    /// Category label, mirrored after the teacher's `PipelineError::category`,
    /// used for metrics labelling and structured log fields.
    pub fn category(&self) -> &'static str {
        match self {
            DocGenError::NoDynamicSections(_) => "input_validation",
            DocGenError::MissingPromptConfig { .. } => "input_validation",
            DocGenError::MalformedSectionMetadata { .. } => "input_validation",
            DocGenError::InputValidation { .. } => "input_validation",
            DocGenError::ImmutabilityViolation { .. } => "immutability",
            DocGenError::Assembly { .. } => "assembly",
            DocGenError::Versioning { .. } => "versioning",
            DocGenError::Job(_) => "job",
            DocGenError::NotFound(_) => "not_found",
            DocGenError::InvalidConfiguration(_) => "configuration",
            DocGenError::Io(_) => "io",
            DocGenError::Database(_) => "database",
            DocGenError::Serialization(_) => "serialization",
            DocGenError::Storage(_) => "storage",
            DocGenError::Internal(_) => "internal",
        }
    }

    /// Whether this error is a transient infrastructure condition worth a
    /// caller-level retry. Mirrors `PipelineError::is_recoverable`; spec.md
    /// §4.2 deliberately keeps retry policy out of the scheduler, so this is
    /// advisory only and unused by the scheduler itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DocGenError::Io(_) | DocGenError::Database(_) | DocGenError::Storage(_))
    }
}

impl From<std::io::Error> for DocGenError {
    fn from(err: std::io::Error) -> Self {
        DocGenError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DocGenError {
    fn from(err: serde_json::Error) -> Self {
        DocGenError::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for DocGenError {
    fn from(err: sqlx::Error) -> Self {
        DocGenError::Database(err.to_string())
    }
}
