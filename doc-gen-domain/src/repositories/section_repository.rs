// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::entities::Section;
use crate::error::DocGenError;
use crate::value_objects::TemplateVersionId;
use async_trait::async_trait;

#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Persists a batch of sections for one template version in a single
    /// transaction (spec §4.9: "for every block, create exactly one Section
    /// row"). `id` is database-assigned (the table's primary key is a global
    /// dense counter shared across every template version), so each `Section`
    /// is written back with the id the adapter assigned it.
    async fn save_all(&self, sections: &mut [Section]) -> Result<(), DocGenError>;

    async fn find_by_template_version(&self, template_version_id: TemplateVersionId) -> Result<Vec<Section>, DocGenError>;

    /// Dynamic sections only, ordered by `(section_id ASC, structural_path
    /// ASC)` per spec §4.4 step 2.
    async fn find_dynamic_ordered(&self, template_version_id: TemplateVersionId) -> Result<Vec<Section>, DocGenError>;
}
