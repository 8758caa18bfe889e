// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Generation input snapshot, grounded on
//! `original_source/backend/app/domains/generation/service.py`
//! (`GenerationInputService.prepare_generation_inputs`): the four subfields
//! captured per dynamic section, frozen at batch-creation time so the
//! resulting input-hash is reproducible byte-for-byte on replay (spec §4.4
//! "Determinism" — no timestamps, UUIDs, or environment data).

use crate::value_objects::ids::SectionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyContext {
    pub parent_heading: Option<String>,
    pub parent_level: Option<u8>,
    pub sibling_index: usize,
    pub total_siblings: usize,
    pub depth: usize,
    pub path_segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub classification_confidence: f64,
    pub classification_method: String,
    pub justification: String,
    pub prompt_template: Option<String>,
    pub generation_hints: Option<Value>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub data_fields: Value,
    #[serde(default)]
    pub custom_context: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurroundingContext {
    pub preceding_structural_path: Option<String>,
    pub preceding_section_type: Option<String>,
    pub following_structural_path: Option<String>,
    pub following_section_type: Option<String>,
    pub hint: String,
}

/// The full per-section snapshot hashed to produce `input_hash`. Field
/// order in the struct is irrelevant to the hash — `canonical_json_hash`
/// sorts keys — but kept here in the same order as spec §4.4 lists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInputSnapshot {
    pub section_id: SectionId,
    pub hierarchy_context: HierarchyContext,
    pub prompt_config: PromptConfig,
    pub client_data: ClientData,
    pub surrounding_context: SurroundingContext,
}

impl GenerationInputSnapshot {
    pub fn to_canonical_value(&self) -> Value {
        serde_json::to_value(self).expect("GenerationInputSnapshot always serializes")
    }
}
