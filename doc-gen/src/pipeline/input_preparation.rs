// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 1: input preparation (spec §4.4), grounded on
//! `original_source/backend/app/domains/generation/service.py`'s
//! `GenerationInputService.prepare_generation_inputs`.

use super::{GenerationRequest, PipelineHandler};
use doc_gen_domain::entities::{GenerationInput, GenerationInputBatch, Section};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::value_objects::{
    batch_hash, ClientData, GenerationInputBatchId, GenerationInputSnapshot, HierarchyContext, PromptConfig,
    SectionId, SurroundingContext,
};
use serde_json::Value;
use std::collections::HashSet;

/// A validated input batch plus the dynamic sections this run will carry
/// forward unchanged from their most recent validated output instead of
/// regenerating (REGENERATE_SECTIONS' `reuse_section_ids`; always empty for
/// GENERATE/REGENERATE).
pub struct PreparedInputs {
    pub batch_id: GenerationInputBatchId,
    pub reuse_section_ids: Vec<SectionId>,
}

pub async fn run(handler: &PipelineHandler, request: &GenerationRequest) -> Result<PreparedInputs, DocGenError> {
    let all_sections = handler.section_repository.find_by_template_version(request.template_version_id).await?;
    let mut ordered: Vec<&Section> = all_sections.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.structural_path.cmp(&b.structural_path)));

    let all_dynamic: Vec<&Section> = ordered.iter().copied().filter(|s| s.is_dynamic()).collect();
    if all_dynamic.is_empty() {
        return Err(DocGenError::NoDynamicSections(request.template_version_id.to_string()));
    }

    let (dynamic, reuse_section_ids) = select_sections_to_regenerate(&all_dynamic, request)?;

    let client_data = build_client_data(&request.client_data);
    let total_dynamic = all_dynamic.len();

    let mut inputs = Vec::with_capacity(dynamic.len());
    for (sequence_order, section) in dynamic.iter().enumerate() {
        let sibling_index = all_dynamic.iter().position(|s| s.id == section.id).unwrap_or(sequence_order);
        let prompt_config = build_prompt_config(section)?;
        let hierarchy_context = build_hierarchy_context(&section.structural_path, sibling_index, total_dynamic);
        let surrounding_context = build_surrounding_context(&ordered, &section.structural_path);

        let snapshot = GenerationInputSnapshot {
            section_id: section.id,
            hierarchy_context,
            prompt_config,
            client_data: client_data.clone(),
            surrounding_context,
        };
        validate_snapshot(&snapshot, &section.structural_path)?;

        inputs.push((sequence_order as i64, section.id, snapshot));
    }

    let batch = GenerationInputBatch::new_pending(request.document_id, request.template_version_id, request.version_intent);
    let generation_inputs: Vec<GenerationInput> = inputs
        .into_iter()
        .map(|(sequence_order, section_id, snapshot)| GenerationInput::new(batch.id, section_id, sequence_order, snapshot))
        .collect();

    handler
        .generation_input_repository
        .save_batch_with_inputs(&batch, &generation_inputs)
        .await?;

    let mut hashes: Vec<_> = generation_inputs.iter().map(|i| i.input_hash.clone()).collect();
    hashes.sort();
    let content_hash = batch_hash(hashes);

    let mut validated = batch;
    validated.validate(content_hash, generation_inputs.len() as i64)?;
    handler.generation_input_repository.validate_batch(&validated).await?;

    Ok(PreparedInputs {
        batch_id: validated.id,
        reuse_section_ids,
    })
}

/// For GENERATE/REGENERATE (`request.section_ids` is `None`), every dynamic
/// section is regenerated and nothing is carried forward. For
/// REGENERATE_SECTIONS, only `request.section_ids` are regenerated; the
/// remaining dynamic sections must all appear in `request.reuse_section_ids`
/// so every dynamic section ends up covered by either path — document
/// assembly requires a validated output for each one (spec §4.6).
fn select_sections_to_regenerate<'a>(
    all_dynamic: &[&'a Section],
    request: &GenerationRequest,
) -> Result<(Vec<&'a Section>, Vec<SectionId>), DocGenError> {
    let Some(section_ids) = &request.section_ids else {
        return Ok((all_dynamic.to_vec(), Vec::new()));
    };

    let dynamic_ids: HashSet<SectionId> = all_dynamic.iter().map(|s| s.id).collect();
    let regenerate_ids: HashSet<SectionId> = section_ids.iter().copied().collect();
    let reuse_ids: HashSet<SectionId> = request.reuse_section_ids.iter().copied().collect();

    let unknown: Vec<SectionId> = regenerate_ids
        .union(&reuse_ids)
        .copied()
        .filter(|id| !dynamic_ids.contains(id))
        .collect();
    if !unknown.is_empty() {
        return Err(DocGenError::internal(format!(
            "section id(s) {unknown:?} are not DYNAMIC sections of this template version"
        )));
    }

    let uncovered: Vec<SectionId> = dynamic_ids
        .iter()
        .copied()
        .filter(|id| !regenerate_ids.contains(id) && !reuse_ids.contains(id))
        .collect();
    if !uncovered.is_empty() {
        return Err(DocGenError::internal(format!(
            "section id(s) {uncovered:?} are neither regenerated nor reused; REGENERATE_SECTIONS must cover every dynamic section"
        )));
    }

    let regenerate: Vec<&Section> = all_dynamic.iter().copied().filter(|s| regenerate_ids.contains(&s.id)).collect();
    let reuse: Vec<SectionId> = all_dynamic.iter().map(|s| s.id).filter(|id| reuse_ids.contains(id)).collect();
    Ok((regenerate, reuse))
}

fn build_client_data(raw: &Value) -> ClientData {
    ClientData {
        client_id: raw.get("client_id").and_then(Value::as_str).unwrap_or_default().to_string(),
        client_name: raw.get("client_name").and_then(Value::as_str).unwrap_or_default().to_string(),
        data_fields: raw.get("data_fields").cloned().unwrap_or(Value::Null),
        custom_context: raw.get("custom_context").cloned().unwrap_or(Value::Null),
    }
}

fn build_prompt_config(section: &Section) -> Result<PromptConfig, DocGenError> {
    let Some(raw) = &section.prompt_config else {
        return Err(DocGenError::MissingPromptConfig {
            section_id: section.id.value(),
            reason: "dynamic section has no prompt_config".to_string(),
        });
    };
    let Value::Object(map) = raw else {
        return Err(DocGenError::MalformedSectionMetadata {
            section_id: section.id.value(),
            reason: "prompt_config is not a JSON object".to_string(),
        });
    };

    let classification_confidence = map
        .get("classification_confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| DocGenError::MissingPromptConfig {
            section_id: section.id.value(),
            reason: "missing classification_confidence".to_string(),
        })?;
    let classification_method = map
        .get("classification_method")
        .and_then(Value::as_str)
        .ok_or_else(|| DocGenError::MissingPromptConfig {
            section_id: section.id.value(),
            reason: "missing classification_method".to_string(),
        })?
        .to_string();
    let justification = map
        .get("justification")
        .and_then(Value::as_str)
        .ok_or_else(|| DocGenError::MissingPromptConfig {
            section_id: section.id.value(),
            reason: "missing justification".to_string(),
        })?
        .to_string();

    Ok(PromptConfig {
        classification_confidence,
        classification_method,
        justification,
        prompt_template: map.get("prompt_template").and_then(Value::as_str).map(str::to_string),
        generation_hints: map.get("generation_hints").cloned(),
        metadata: map.get("metadata").cloned(),
    })
}

/// Derives hierarchy context purely from `structural_path` (spec §4.4 step
/// 3: "path-segments derived by splitting structural-path on `/`"). This
/// system does not attach a heading tree to `Section` rows, so
/// `parent_heading`/`parent_level` stay `None` rather than being guessed.
fn build_hierarchy_context(structural_path: &str, sibling_index: usize, total_siblings: usize) -> HierarchyContext {
    let path_segments: Vec<String> = structural_path.split('/').map(str::to_string).collect();
    HierarchyContext {
        parent_heading: None,
        parent_level: None,
        sibling_index,
        total_siblings,
        depth: path_segments.len(),
        path_segments,
    }
}

fn build_surrounding_context(ordered: &[&Section], structural_path: &str) -> SurroundingContext {
    let index = ordered.iter().position(|s| s.structural_path == structural_path);
    let preceding = index.and_then(|i| i.checked_sub(1)).and_then(|i| ordered.get(i));
    let following = index.and_then(|i| ordered.get(i + 1));

    SurroundingContext {
        preceding_structural_path: preceding.map(|s| s.structural_path.clone()),
        preceding_section_type: preceding.map(|s| format!("{:?}", s.section_type).to_uppercase()),
        following_structural_path: following.map(|s| s.structural_path.clone()),
        following_section_type: following.map(|s| format!("{:?}", s.section_type).to_uppercase()),
        hint: match (preceding.is_some(), following.is_some()) {
            (true, true) => "between two other blocks".to_string(),
            (true, false) => "last block in the document".to_string(),
            (false, true) => "first block in the document".to_string(),
            (false, false) => "only block in the document".to_string(),
        },
    }
}

fn validate_snapshot(snapshot: &GenerationInputSnapshot, structural_path: &str) -> Result<(), DocGenError> {
    if !snapshot.section_id.is_valid() {
        return Err(DocGenError::InputValidation {
            field: "section_id".to_string(),
            reason: "section_id must be > 0".to_string(),
            section_id: snapshot.section_id.value(),
            invalid_value: snapshot.section_id.to_string(),
        });
    }
    if structural_path.is_empty() {
        return Err(DocGenError::InputValidation {
            field: "structural_path".to_string(),
            reason: "structural_path must be non-empty".to_string(),
            section_id: snapshot.section_id.value(),
            invalid_value: structural_path.to_string(),
        });
    }
    if !(0.0..=1.0).contains(&snapshot.prompt_config.classification_confidence) {
        return Err(DocGenError::InputValidation {
            field: "classification_confidence".to_string(),
            reason: "must be in [0, 1]".to_string(),
            section_id: snapshot.section_id.value(),
            invalid_value: snapshot.prompt_config.classification_confidence.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_gen_domain::value_objects::{SectionId, SectionType, TemplateVersionId};
    use serde_json::json;

    fn dynamic_section(id: i64, path: &str) -> Section {
        Section {
            id: SectionId::new(id),
            template_version_id: TemplateVersionId::new(),
            section_type: SectionType::Dynamic,
            structural_path: path.to_string(),
            prompt_config: Some(json!({
                "classification_confidence": 0.9,
                "classification_method": "RULE_BASED",
                "justification": "placeholder marker",
            })),
        }
    }

    #[test]
    fn prompt_config_requires_three_fields() {
        let section = Section {
            prompt_config: Some(json!({"classification_confidence": 0.9})),
            ..dynamic_section(1, "body/block/0")
        };
        let result = build_prompt_config(&section);
        assert!(matches!(result, Err(DocGenError::MissingPromptConfig { .. })));
    }

    #[test]
    fn surrounding_context_identifies_neighbours() {
        let a = dynamic_section(1, "body/block/0");
        let b = dynamic_section(2, "body/block/1");
        let c = dynamic_section(3, "body/block/2");
        let ordered = vec![&a, &b, &c];
        let ctx = build_surrounding_context(&ordered, "body/block/1");
        assert_eq!(ctx.preceding_structural_path.as_deref(), Some("body/block/0"));
        assert_eq!(ctx.following_structural_path.as_deref(), Some("body/block/2"));
        assert_eq!(ctx.hint, "between two other blocks");
    }

    #[test]
    fn hierarchy_context_splits_structural_path() {
        let ctx = build_hierarchy_context("body/block/5", 2, 10);
        assert_eq!(ctx.path_segments, vec!["body", "block", "5"]);
        assert_eq!(ctx.depth, 3);
        assert_eq!(ctx.sibling_index, 2);
        assert_eq!(ctx.total_siblings, 10);
    }

    fn request_with(section_ids: Option<Vec<SectionId>>, reuse_section_ids: Vec<SectionId>) -> GenerationRequest {
        GenerationRequest {
            template_version_id: TemplateVersionId::new(),
            document_id: doc_gen_domain::value_objects::DocumentId::new(),
            version_intent: 1,
            client_data: Value::Null,
            force_reassembly: true,
            section_ids,
            reuse_section_ids,
        }
    }

    #[test]
    fn no_section_filter_regenerates_every_dynamic_section() {
        let a = dynamic_section(1, "body/block/0");
        let b = dynamic_section(2, "body/block/1");
        let all_dynamic = vec![&a, &b];
        let request = request_with(None, vec![]);

        let (regenerate, reuse) = select_sections_to_regenerate(&all_dynamic, &request).unwrap();
        assert_eq!(regenerate.len(), 2);
        assert!(reuse.is_empty());
    }

    #[test]
    fn section_filter_splits_regenerate_and_reuse() {
        let a = dynamic_section(1, "body/block/0");
        let b = dynamic_section(2, "body/block/1");
        let c = dynamic_section(3, "body/block/2");
        let all_dynamic = vec![&a, &b, &c];
        let request = request_with(Some(vec![SectionId::new(2)]), vec![SectionId::new(1), SectionId::new(3)]);

        let (regenerate, reuse) = select_sections_to_regenerate(&all_dynamic, &request).unwrap();
        assert_eq!(regenerate.iter().map(|s| s.id).collect::<Vec<_>>(), vec![SectionId::new(2)]);
        assert_eq!(reuse, vec![SectionId::new(1), SectionId::new(3)]);
    }

    #[test]
    fn section_filter_rejects_dynamic_section_left_uncovered() {
        let a = dynamic_section(1, "body/block/0");
        let b = dynamic_section(2, "body/block/1");
        let all_dynamic = vec![&a, &b];
        let request = request_with(Some(vec![SectionId::new(1)]), vec![]);

        let result = select_sections_to_regenerate(&all_dynamic, &request);
        assert!(matches!(result, Err(DocGenError::Internal(_))));
    }

    #[test]
    fn section_filter_rejects_unknown_section_id() {
        let a = dynamic_section(1, "body/block/0");
        let all_dynamic = vec![&a];
        let request = request_with(Some(vec![SectionId::new(99)]), vec![]);

        let result = select_sections_to_regenerate(&all_dynamic, &request);
        assert!(matches!(result, Err(DocGenError::Internal(_))));
    }
}
