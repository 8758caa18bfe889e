// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end pipeline integration test (spec §8 scenarios 1-2): a full
//! `PipelineHandler::run` over real sqlite repositories and a real
//! filesystem object store, with the LLM client and renderer swapped for
//! their in-crate conservative defaults.

use doc_gen::infrastructure::llm::MockLlmClient;
use doc_gen::infrastructure::object_store::{template_parsed_key, FsObjectStore};
use doc_gen::infrastructure::renderer::NullRenderer;
use doc_gen::infrastructure::sqlite::{
    self, SqliteAssembledDocumentRepository, SqliteAuditLogRepository, SqliteDocumentRepository, SqliteDocumentVersionRepository,
    SqliteGenerationInputRepository, SqliteRenderedDocumentRepository, SqliteSectionOutputRepository, SqliteSectionRepository,
    SqliteTemplateRepository, SqliteTemplateVersionRepository,
};
use doc_gen::pipeline::{GenerationRequest, PipelineHandler};
use doc_gen_domain::entities::{Document, Section, Template, TemplateVersion};
use doc_gen_domain::repositories::{DocumentRepository, DocumentVersionRepository, TemplateRepository, TemplateVersionRepository as _};
use doc_gen_domain::services::{NoopMetricsRecorder, ObjectStore};
use doc_gen_domain::value_objects::{
    text_hash, Block, ParagraphFormatting, SectionId, TextRun,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

async fn fresh_pool() -> sqlx::SqlitePool {
    let file = tempfile::NamedTempFile::new().expect("create temp db file");
    let path = file.path().to_path_buf();
    std::mem::forget(file);
    sqlite::connect(&format!("sqlite://{}", path.display()), 10).await.expect("connect + migrate")
}

/// Three blocks: STATIC paragraph, DYNAMIC paragraph, STATIC paragraph
/// (spec §8 scenario 1).
fn sample_blocks() -> Vec<Block> {
    vec![
        Block::Paragraph {
            block_id: "b0".into(),
            sequence: 0,
            runs: vec![TextRun::plain("This agreement is between the parties listed below.")],
            formatting: ParagraphFormatting::default(),
        },
        Block::Paragraph {
            block_id: "b1".into(),
            sequence: 1,
            runs: vec![TextRun::plain("{{client_summary}}")],
            formatting: ParagraphFormatting::default(),
        },
        Block::Paragraph {
            block_id: "b2".into(),
            sequence: 2,
            runs: vec![TextRun::plain("Signed and dated as of the effective date above.")],
            formatting: ParagraphFormatting::default(),
        },
    ]
}

struct Fixture {
    handler: PipelineHandler,
    document_id: doc_gen_domain::value_objects::DocumentId,
    template_version_id: doc_gen_domain::value_objects::TemplateVersionId,
    document_repository: Arc<dyn DocumentRepository>,
    document_version_repository: Arc<dyn DocumentVersionRepository>,
    _object_store_dir: tempfile::TempDir,
}

async fn build_fixture() -> Fixture {
    let pool = fresh_pool().await;
    let object_dir = tempdir().unwrap();
    let object_store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(object_dir.path()));

    let template_repository = SqliteTemplateRepository::new(pool.clone());
    let template_version_repository = SqliteTemplateVersionRepository::new(pool.clone());
    let section_repository = SqliteSectionRepository::new(pool.clone());
    let document_repository: Arc<dyn DocumentRepository> = Arc::new(SqliteDocumentRepository::new(pool.clone()));
    let document_version_repository: Arc<dyn DocumentVersionRepository> = Arc::new(SqliteDocumentVersionRepository::new(pool.clone()));

    let template = Template::new("master-services-agreement");
    template_repository.save(&template).await.unwrap();

    let mut template_version = TemplateVersion::new(template.id, 1, "templates/t/1/source.docx");
    template_version_repository.save(&template_version).await.unwrap();

    let blocks = sample_blocks();
    let parsed = doc_gen_domain::value_objects::ParsedDocument {
        template_version_id: template_version.id,
        template_id: template.id,
        version_number: 1,
        content_hash: text_hash("parsed-fixture"),
        metadata: json!({}),
        blocks: blocks.clone(),
        headers: vec![],
        footers: vec![],
    };
    let parsed_key = template_parsed_key(&template.id.to_string(), 1);
    object_store
        .put(&parsed_key, serde_json::to_vec(&parsed).unwrap(), Some("application/json"))
        .await
        .unwrap();
    template_version.mark_in_progress().unwrap();
    template_version.mark_completed(parsed_key, parsed.content_hash.clone()).unwrap();
    template_version_repository.update(&template_version).await.unwrap();

    let placeholder = SectionId::new(i64::MAX);
    let mut sections = vec![
        Section::new_static(placeholder, template_version.id, "body/block/0"),
        Section::new_dynamic(
            placeholder,
            template_version.id,
            "body/block/1",
            json!({
                "classification_confidence": 0.95,
                "classification_method": "RULE_BASED",
                "justification": "placeholder token {{client_summary}}",
            }),
        ),
        Section::new_static(placeholder, template_version.id, "body/block/2"),
    ];
    doc_gen_domain::repositories::SectionRepository::save_all(&section_repository, &mut sections).await.unwrap();

    let document = Document::new(template_version.id);
    document_repository.save(&document).await.unwrap();

    let renderer: Arc<dyn doc_gen_domain::services::Renderer> = Arc::new(NullRenderer::new(object_store.clone()));

    let handler = PipelineHandler {
        template_version_repository: Arc::new(template_version_repository),
        section_repository: Arc::new(section_repository),
        generation_input_repository: Arc::new(SqliteGenerationInputRepository::new(pool.clone())),
        section_output_repository: Arc::new(SqliteSectionOutputRepository::new(pool.clone())),
        assembled_document_repository: Arc::new(SqliteAssembledDocumentRepository::new(pool.clone())),
        rendered_document_repository: Arc::new(SqliteRenderedDocumentRepository::new(pool.clone())),
        document_repository: document_repository.clone(),
        document_version_repository: document_version_repository.clone(),
        audit_log_repository: Arc::new(SqliteAuditLogRepository::new(pool.clone())),
        object_store,
        llm_client: Arc::new(MockLlmClient),
        renderer,
        metrics: Arc::new(NoopMetricsRecorder),
    };

    Fixture {
        handler,
        document_id: document.id,
        template_version_id: template_version.id,
        document_repository,
        document_version_repository,
        _object_store_dir: object_dir,
    }
}

fn generation_request(fixture: &Fixture, client_name: &str) -> GenerationRequest {
    GenerationRequest {
        template_version_id: fixture.template_version_id,
        document_id: fixture.document_id,
        version_intent: 1,
        client_data: json!({
            "client_id": "acme-co",
            "client_name": client_name,
            "data_fields": { "effective_date": "2026-01-01" },
            "custom_context": {},
        }),
        force_reassembly: false,
        section_ids: None,
        reuse_section_ids: Vec::new(),
    }
}

/// Spec §8 scenario 1: a complete happy-path run produces exactly one
/// `DocumentVersion` at version 1, and the document's `current_version`
/// advances to match.
#[tokio::test]
async fn happy_path_produces_first_version() {
    let fixture = build_fixture().await;
    let request = generation_request(&fixture, "Acme Co.");

    let state = fixture.handler.run(request).await;

    assert!(!state.is_failed(), "pipeline should not fail: {:?}", state.error);
    assert_eq!(state.version_number, Some(1));

    let document = fixture.document_repository.find_by_id(fixture.document_id).await.unwrap().unwrap();
    assert_eq!(document.current_version, 1);

    let version = fixture
        .document_version_repository
        .find_by_document_and_version(fixture.document_id, 1)
        .await
        .unwrap()
        .expect("version 1 exists");
    assert_eq!(version.version_number, 1);
}

/// Spec §8 scenario 2: re-running generation with identical client data
/// resolves to the existing version via content-hash dedup rather than
/// minting a new one, and `current_version` does not move.
#[tokio::test]
async fn identical_content_deduplicates_to_existing_version() {
    let fixture = build_fixture().await;

    let first_state = fixture.handler.run(generation_request(&fixture, "Acme Co.")).await;
    assert!(!first_state.is_failed(), "first run should not fail: {:?}", first_state.error);
    assert_eq!(first_state.version_number, Some(1));

    let second_state = fixture.handler.run(generation_request(&fixture, "Acme Co.")).await;
    assert!(!second_state.is_failed(), "second run should not fail: {:?}", second_state.error);
    assert_eq!(second_state.version_number, Some(1), "identical content must dedup to version 1");

    let document = fixture.document_repository.find_by_id(fixture.document_id).await.unwrap().unwrap();
    assert_eq!(document.current_version, 1, "current_version must not advance on a duplicate");

    let all_versions_at_one = fixture
        .document_version_repository
        .find_by_document_and_version(fixture.document_id, 2)
        .await
        .unwrap();
    assert!(all_versions_at_one.is_none(), "no second version should have been created");
}

/// Spec §8 invariant 8: a stage that fails attributes `error_stage` to
/// itself and advances no further. A generated completion that never forms
/// a complete sentence is rejected by the content-constraint check, failing
/// the whole batch and stopping the pipeline at `SectionGeneration`.
#[tokio::test]
async fn unacceptable_generated_content_fails_section_generation() {
    struct UnpunctuatedLlmClient;
    #[async_trait::async_trait]
    impl doc_gen_domain::services::LlmClient for UnpunctuatedLlmClient {
        async fn generate_section(
            &self,
            _snapshot: &doc_gen_domain::value_objects::GenerationInputSnapshot,
        ) -> Result<String, doc_gen_domain::error::DocGenError> {
            Ok("this completion never terminates with punctuation".to_string())
        }
    }

    let fixture = build_fixture().await;
    let request = generation_request(&fixture, "Acme Co.");
    let handler = PipelineHandler {
        llm_client: Arc::new(UnpunctuatedLlmClient),
        ..fixture.handler
    };

    let state = handler.run(request).await;

    assert!(state.is_failed());
    assert_eq!(state.error_stage, Some(doc_gen_domain::value_objects::PipelineStage::SectionGeneration));
    assert_eq!(state.version_number, None, "no version should be created when an earlier stage fails");
}
