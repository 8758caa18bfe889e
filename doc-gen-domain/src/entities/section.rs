// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::{SectionId, SectionType, TemplateVersionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Created by classification; immutable thereafter. Exactly one `Section`
/// per classified block (spec §3). `prompt_config` is `None` for STATIC
/// sections and required for DYNAMIC ones — spec §9 notes only the
/// `structural_path` addressing form is load-bearing; the legacy
/// name/content/order form is intentionally not modeled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub template_version_id: TemplateVersionId,
    pub section_type: SectionType,
    pub structural_path: String,
    pub prompt_config: Option<Value>,
}

impl Section {
    pub fn new_static(id: SectionId, template_version_id: TemplateVersionId, structural_path: impl Into<String>) -> Self {
        Self {
            id,
            template_version_id,
            section_type: SectionType::Static,
            structural_path: structural_path.into(),
            prompt_config: None,
        }
    }

    pub fn new_dynamic(
        id: SectionId,
        template_version_id: TemplateVersionId,
        structural_path: impl Into<String>,
        prompt_config: Value,
    ) -> Self {
        Self {
            id,
            template_version_id,
            section_type: SectionType::Dynamic,
            structural_path: structural_path.into(),
            prompt_config: Some(prompt_config),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.section_type == SectionType::Dynamic
    }
}
