// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::error::DocGenError;
use crate::value_objects::{DocumentId, TemplateVersionId};
use serde::{Deserialize, Serialize};

/// `current_version` monotonically increases; only advanced on successful
/// version creation (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub template_version_id: TemplateVersionId,
    pub current_version: i64,
}

impl Document {
    pub fn new(template_version_id: TemplateVersionId) -> Self {
        Self {
            id: DocumentId::new(),
            template_version_id,
            current_version: 0,
        }
    }

    /// Advances `current_version`; rejects any value that would regress or
    /// stall the pointer (spec §4.8 invariant: "current-version never
    /// regresses").
    pub fn advance_version(&mut self, new_version: i64) -> Result<(), DocGenError> {
        if new_version <= self.current_version {
            return Err(DocGenError::internal(format!(
                "document {}: refusing to advance current_version from {} to {}",
                self.id, self.current_version, new_version
            )));
        }
        self.current_version = new_version;
        Ok(())
    }
}
