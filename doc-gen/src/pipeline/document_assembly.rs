// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 3: document assembly (spec §4.6), grounded on
//! `original_source/backend/app/domains/assembly/service.py`'s
//! `ContentInjector` + structural-integrity validation pass.

use super::{GenerationRequest, PipelineHandler};
use doc_gen_domain::entities::{AssembledDocument, AuditAction, AuditEntityType, AuditLog, InjectionResult, Section};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::value_objects::{assembly_hash, AssemblyErrorCode, Block, ParsedDocument, SectionOutputBatchId};
use rayon::prelude::*;
use serde_json::json;
use std::collections::{HashMap, HashSet};

pub struct AssemblyOutcome {
    pub id: doc_gen_domain::value_objects::AssembledDocumentId,
    pub blocks: Vec<Block>,
}

pub async fn run(handler: &PipelineHandler, request: &GenerationRequest, output_batch_id: SectionOutputBatchId) -> Result<AssemblyOutcome, DocGenError> {
    if let Some(existing) = handler.assembled_document_repository.find_by_output_batch(output_batch_id).await? {
        if existing.is_immutable && !request.force_reassembly {
            return assembly_error(AssemblyErrorCode::AssemblyAlreadyExists, format!("batch {output_batch_id} already assembled"));
        }
    }

    let template_version = handler
        .template_version_repository
        .find_by_id(request.template_version_id)
        .await?
        .ok_or_else(|| DocGenError::not_found(format!("template version {}", request.template_version_id)))?;
    let parsed_path = template_version
        .parsed_path
        .as_ref()
        .ok_or_else(|| assembly_error_message(AssemblyErrorCode::MissingParsedTemplate, "template version has no parsed_path"))?;
    let parsed_bytes = handler
        .object_store
        .get(parsed_path)
        .await?
        .ok_or_else(|| assembly_error_message(AssemblyErrorCode::MissingParsedTemplate, format!("object store has no blob at {parsed_path}")))?;
    let parsed: ParsedDocument =
        serde_json::from_slice(&parsed_bytes).map_err(|e| DocGenError::internal(format!("malformed parsed document: {e}")))?;

    let validated_outputs = handler.section_output_repository.find_validated_for_batch(output_batch_id).await?;
    let outputs_by_section: HashMap<_, _> = validated_outputs
        .iter()
        .filter_map(|o| o.generated_content.as_ref().map(|content| (o.section_id, content.clone())))
        .collect();

    let sections = handler.section_repository.find_by_template_version(request.template_version_id).await?;
    let sections_by_path: HashMap<&str, &Section> = sections.iter().map(|s| (s.structural_path.as_str(), s)).collect();

    for section in sections.iter().filter(|s| s.is_dynamic()) {
        if !outputs_by_section.contains_key(&section.id) {
            return assembly_error(
                AssemblyErrorCode::MissingValidatedContent,
                format!("dynamic section {} has no validated output", section.id),
            );
        }
    }

    let mut assembled = AssembledDocument::new_pending(request.document_id, request.template_version_id, request.version_intent, output_batch_id);
    handler.assembled_document_repository.save(&assembled).await?;
    assembled.mark_in_progress()?;
    handler.assembled_document_repository.update(&assembled).await?;

    match assemble(&parsed.blocks, &sections_by_path, &outputs_by_section) {
        Ok((assembled_blocks, injection_results)) => {
            if let Err((code, message)) = validate_structure(&parsed.blocks, &assembled_blocks, &sections) {
                assembled.fail()?;
                handler.assembled_document_repository.update(&assembled).await?;
                audit(handler, assembled.id.to_string(), AuditAction::DocumentAssemblyFailed, json!({ "code": format!("{code:?}"), "message": message })).await;
                return assembly_error(code, message);
            }

            // Block content hashing is pure CPU work with no ordering
            // dependency between blocks; `rayon` spreads it across the
            // process's worker-stealing pool instead of running it on the
            // single cooperative task driving this pipeline run (spec §5:
            // "CPU work ... free to move onto a dedicated executor").
            // `par_iter` on a `Vec` preserves the source order in `collect`.
            let ordered_hashes: Vec<(String, String)> = assembled_blocks
                .par_iter()
                .map(|b| (b.block_id().to_string(), b.content_hash()))
                .collect();
            let hash = assembly_hash(
                &request.document_id.to_string(),
                &request.template_version_id.to_string(),
                request.version_intent,
                &output_batch_id.to_string(),
                &ordered_hashes,
            );

            assembled.validate(hash, parsed.blocks.len() as i64, assembled_blocks.len() as i64, injection_results)?;
            handler.assembled_document_repository.update(&assembled).await?;
            audit(handler, assembled.id.to_string(), AuditAction::DocumentAssemblyCompleted, json!({ "block_count": assembled_blocks.len() })).await;

            Ok(AssemblyOutcome {
                id: assembled.id,
                blocks: assembled_blocks,
            })
        }
        Err((code, message)) => {
            assembled.fail()?;
            handler.assembled_document_repository.update(&assembled).await?;
            audit(handler, assembled.id.to_string(), AuditAction::DocumentAssemblyFailed, json!({ "code": format!("{code:?}"), "message": message.clone() })).await;
            assembly_error(code, message)
        }
    }
}

async fn audit(handler: &PipelineHandler, entity_id: String, action: AuditAction, metadata: serde_json::Value) {
    if let Err(e) = handler
        .audit_log_repository
        .append(&AuditLog::new(AuditEntityType::AssembledDocument, entity_id, action, metadata))
        .await
    {
        tracing::warn!(error = %e, "failed to append document-assembly audit entry");
    }
}

fn assemble(
    original_blocks: &[Block],
    sections_by_path: &HashMap<&str, &Section>,
    outputs_by_section: &HashMap<doc_gen_domain::value_objects::SectionId, String>,
) -> Result<(Vec<Block>, Vec<InjectionResult>), (AssemblyErrorCode, String)> {
    let mut assembled_blocks = Vec::with_capacity(original_blocks.len());
    let mut injection_results = Vec::with_capacity(original_blocks.len());

    for block in original_blocks {
        let structural_path = block.structural_path();
        let original_hash = block.content_hash();
        let section = sections_by_path.get(structural_path.as_str());

        let content = section
            .filter(|s| s.is_dynamic())
            .and_then(|s| outputs_by_section.get(&s.id));

        match content {
            Some(content) if block.supports_injection() => {
                let injected = block
                    .with_injected_content(content)
                    .ok_or_else(|| (AssemblyErrorCode::InvalidInjectionTarget, format!("block {} rejected injection", block.block_id())))?;
                let assembled_hash = injected.content_hash();
                injection_results.push(InjectionResult {
                    block_id: block.block_id().to_string(),
                    was_injected: true,
                    was_modified: true,
                    is_dynamic: true,
                    original_hash,
                    assembled_hash,
                    reason: None,
                });
                assembled_blocks.push(injected);
            }
            Some(_) => {
                injection_results.push(InjectionResult {
                    block_id: block.block_id().to_string(),
                    was_injected: false,
                    was_modified: false,
                    is_dynamic: true,
                    original_hash: original_hash.clone(),
                    assembled_hash: original_hash,
                    reason: Some("Unsupported block type for injection".to_string()),
                });
                assembled_blocks.push(block.clone());
            }
            None => {
                injection_results.push(InjectionResult {
                    block_id: block.block_id().to_string(),
                    was_injected: false,
                    was_modified: false,
                    is_dynamic: false,
                    original_hash: original_hash.clone(),
                    assembled_hash: original_hash,
                    reason: None,
                });
                assembled_blocks.push(block.clone());
            }
        }
    }

    Ok((assembled_blocks, injection_results))
}

fn validate_structure(original: &[Block], assembled: &[Block], sections: &[Section]) -> Result<(), (AssemblyErrorCode, String)> {
    if original.len() != assembled.len() {
        return Err((
            AssemblyErrorCode::BlockCountMismatch,
            format!("original has {} blocks, assembled has {}", original.len(), assembled.len()),
        ));
    }

    let original_ids: Vec<&str> = original.iter().map(|b| b.block_id()).collect();
    let assembled_ids: Vec<&str> = assembled.iter().map(|b| b.block_id()).collect();
    if original_ids != assembled_ids {
        let original_set: HashSet<&str> = original_ids.iter().copied().collect();
        let assembled_set: HashSet<&str> = assembled_ids.iter().copied().collect();
        if original_set != assembled_set {
            let orphan = assembled_set.difference(&original_set).next().or_else(|| original_set.difference(&assembled_set).next());
            return Err((AssemblyErrorCode::OrphanedBlock, format!("block id not present in both sequences: {orphan:?}")));
        }
        return Err((AssemblyErrorCode::BlockOrderMismatch, "assembled block order does not match original order".to_string()));
    }
    for (o, a) in original.iter().zip(assembled.iter()) {
        if o.block_type_tag() != a.block_type_tag() {
            return Err((
                AssemblyErrorCode::StructuralMismatch,
                format!("block {} changed type from {} to {}", o.block_id(), o.block_type_tag(), a.block_type_tag()),
            ));
        }
    }

    let static_ids: HashSet<&str> = sections
        .iter()
        .filter(|s| !s.is_dynamic())
        .map(|s| s.structural_path.as_str())
        .collect();
    for (o, a) in original.iter().zip(assembled.iter()) {
        if static_ids.contains(o.structural_path().as_str()) && o.content_hash() != a.content_hash() {
            return Err((
                AssemblyErrorCode::StaticSectionModified,
                format!("static block {} was modified during assembly", o.block_id()),
            ));
        }
    }

    Ok(())
}

fn assembly_error<T>(code: AssemblyErrorCode, message: impl Into<String>) -> Result<T, DocGenError> {
    Err(DocGenError::Assembly { code, message: message.into() })
}

fn assembly_error_message(code: AssemblyErrorCode, message: impl Into<String>) -> DocGenError {
    DocGenError::Assembly { code, message: message.into() }
}
