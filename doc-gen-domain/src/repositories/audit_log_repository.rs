// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::{AuditEntityType, AuditLog};
use crate::error::DocGenError;
use async_trait::async_trait;

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &AuditLog) -> Result<(), DocGenError>;

    /// Exposes only the documented query predicates, not in-process
    /// post-filtering — spec §9 leaves the original's cursor/paging
    /// semantics as an explicit open question, so this is deliberately
    /// narrow: entity-type + entity-id lookup only.
    async fn find_for_entity(
        &self,
        entity_type: AuditEntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditLog>, DocGenError>;
}
