// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Strongly-typed entity identifiers.
//!
//! Grounded on the teacher's `PipelineId` newtype
//! (`adaptive_pipeline_domain/src/value_objects/pipeline_id.rs`), but backed
//! by `Uuid::new_v4()` instead of ULID: the teacher uses ULID for
//! lexicographic time-ordering, which nothing in this domain relies on —
//! job and version ordering here is by explicit `started_at`/`version_number`
//! columns, not by id value. `SectionId` is the one exception: spec §3 calls
//! out a dense integer key for sections, so it wraps `i64` instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(TemplateId);
uuid_id!(TemplateVersionId);
uuid_id!(DocumentId);
uuid_id!(JobId);
uuid_id!(GenerationInputBatchId);
uuid_id!(GenerationInputId);
uuid_id!(SectionOutputBatchId);
uuid_id!(SectionOutputId);
uuid_id!(AssembledDocumentId);
uuid_id!(RenderedDocumentId);
uuid_id!(DocumentVersionId);
uuid_id!(AuditLogId);

/// Section identity is a dense integer per spec §3 ("id (dense integer)"),
/// not a UUID — sections are ordered and counted, and a dense key makes
/// `sequence-order` assignment in input preparation a straight sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub i64);

impl SectionId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
