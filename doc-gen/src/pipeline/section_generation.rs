// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stage 2: section generation (spec §4.5), grounded on
//! `original_source/backend/app/domains/generation/service.py`'s
//! `SectionGenerationService`.

use super::PipelineHandler;
use doc_gen_domain::entities::{AuditAction, AuditEntityType, AuditLog, SectionOutput, SectionOutputBatch};
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::value_objects::{DocumentId, GenerationInputBatchId, SectionId};
use serde_json::json;

/// Generated content shorter than this is rejected as unusably thin; longer
/// than this is rejected as a runaway/garbled completion. Spec §4.5 names
/// the constraint ("min/max length, complete sentences") without fixing
/// numbers, so these mirror the conservative bounds the fallback classifier
/// and mock LLM client already assume elsewhere in this crate.
const MIN_CONTENT_LENGTH: usize = 8;
const MAX_CONTENT_LENGTH: usize = 20_000;

pub async fn run(
    handler: &PipelineHandler,
    input_batch_id: GenerationInputBatchId,
    document_id: DocumentId,
    reuse_section_ids: &[SectionId],
) -> Result<doc_gen_domain::value_objects::SectionOutputBatchId, DocGenError> {
    let inputs = handler.generation_input_repository.find_inputs_for_batch(input_batch_id).await?;
    let mut inputs = inputs;
    inputs.sort_by_key(|i| i.sequence_order);

    let mut batch = SectionOutputBatch::new(input_batch_id, (inputs.len() + reuse_section_ids.len()) as i64);
    handler.section_output_repository.save_batch(&batch).await?;

    let mut failed_count = 0i64;
    for input in &inputs {
        let mut output = SectionOutput::new_pending(batch.id, input_batch_id, input.section_id);
        handler.section_output_repository.save_output(&output).await?;

        match handler.llm_client.generate_section(&input.snapshot).await {
            Ok(content) if is_acceptable(&content) => {
                output.validate(content)?;
                audit(handler, input.section_id.to_string(), AuditAction::SectionGenerationCompleted, json!({ "output_id": output.id.to_string() })).await;
            }
            _ => {
                output.fail()?;
                failed_count += 1;
                audit(handler, input.section_id.to_string(), AuditAction::SectionGenerationFailed, json!({ "output_id": output.id.to_string() })).await;
            }
        }
        handler.section_output_repository.update_output(&output).await?;
    }

    for &section_id in reuse_section_ids {
        let previous = handler
            .section_output_repository
            .find_latest_validated_for_document_section(document_id, section_id)
            .await?
            .ok_or_else(|| DocGenError::internal(format!("no prior validated output to reuse for section {section_id}")))?;
        let content = previous
            .generated_content
            .ok_or_else(|| DocGenError::internal(format!("reused output for section {section_id} has no content")))?;

        let mut output = SectionOutput::new_pending(batch.id, input_batch_id, section_id);
        handler.section_output_repository.save_output(&output).await?;
        output.validate(content)?;
        handler.section_output_repository.update_output(&output).await?;
        audit(
            handler,
            section_id.to_string(),
            AuditAction::SectionGenerationCompleted,
            json!({ "output_id": output.id.to_string(), "reused_from": previous.id.to_string() }),
        )
        .await;
    }

    batch.failed_count = failed_count;
    handler.section_output_repository.update_batch(&batch).await?;

    if batch.has_failures() {
        audit(
            handler,
            batch.id.to_string(),
            AuditAction::BatchGenerationFailed,
            json!({ "failed_count": failed_count, "total_inputs": inputs.len() }),
        )
        .await;
        return Err(DocGenError::Job(format!(
            "section generation failed for {} of {} outputs in batch {}",
            failed_count,
            inputs.len(),
            batch.id
        )));
    }

    audit(handler, batch.id.to_string(), AuditAction::BatchGenerationCompleted, json!({ "total_inputs": inputs.len() })).await;
    Ok(batch.id)
}

async fn audit(handler: &PipelineHandler, entity_id: String, action: AuditAction, metadata: serde_json::Value) {
    let entity_type = match action {
        AuditAction::SectionGenerationCompleted | AuditAction::SectionGenerationFailed => AuditEntityType::SectionOutput,
        _ => AuditEntityType::SectionOutputBatch,
    };
    if let Err(e) = handler.audit_log_repository.append(&AuditLog::new(entity_type, entity_id, action, metadata)).await {
        tracing::warn!(error = %e, "failed to append section-generation audit entry");
    }
}

fn is_acceptable(content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed.len() < MIN_CONTENT_LENGTH || trimmed.len() > MAX_CONTENT_LENGTH {
        return false;
    }
    matches!(trimmed.chars().last(), Some('.') | Some('!') | Some('?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_content() {
        assert!(!is_acceptable("Hi."));
    }

    #[test]
    fn rejects_incomplete_sentences() {
        assert!(!is_acceptable("this has no terminal punctuation and is long enough"));
    }

    #[test]
    fn accepts_well_formed_content() {
        assert!(is_acceptable("This is a complete sentence with enough length."));
    }
}
