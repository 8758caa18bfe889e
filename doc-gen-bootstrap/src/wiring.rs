// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Composition root: builds every collaborator and repository adapter from
//! `AppConfig` and assembles the `PipelineHandler` / `ClassificationService`
//! / `JobHandlers` / `Worker` graph the CLI subcommands drive. Kept separate
//! from `main.rs` so each subcommand only has to ask for the pieces it
//! needs, grounded on the teacher's composition-root concept documented in
//! `adaptive_pipeline_bootstrap::lib` (never wired there in practice, since
//! the teacher's own binary builds its services inline in `main`).

use doc_gen::config::AppConfig;
use doc_gen::infrastructure::classification::ClassificationService;
use doc_gen::infrastructure::coordination::InMemoryCoordinationStore;
use doc_gen::infrastructure::llm::{MockLlmClient, NoopLlmClassifier};
use doc_gen::infrastructure::object_store::FsObjectStore;
use doc_gen::infrastructure::parser::PlaintextTemplateParser;
use doc_gen::infrastructure::renderer::NullRenderer;
use doc_gen::infrastructure::sqlite;
use doc_gen::metrics::PrometheusMetricsRecorder;
use doc_gen::pipeline::PipelineHandler;
use doc_gen::scheduler::job_handlers::JobHandlers;
use doc_gen::scheduler::Worker;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::repositories::{DocumentRepository, DocumentVersionRepository, JobRepository, TemplateRepository, TemplateVersionRepository};
use doc_gen_domain::services::{CoordinationStore, MetricsRecorder, ObjectStore, TemplateParser};
use std::sync::Arc;

/// Every long-lived component the CLI subcommands share. Built once per
/// process invocation; cheap to construct since every adapter here holds at
/// most a pool handle or a root path.
pub struct Components {
    pub config: AppConfig,
    pub object_store: Arc<dyn ObjectStore>,
    pub template_repository: Arc<dyn TemplateRepository>,
    pub template_version_repository: Arc<dyn TemplateVersionRepository>,
    pub document_repository: Arc<dyn DocumentRepository>,
    pub document_version_repository: Arc<dyn DocumentVersionRepository>,
    pub job_repository: Arc<dyn JobRepository>,
    pub template_parser: Arc<dyn TemplateParser>,
    pub pipeline: Arc<PipelineHandler>,
    pub job_handlers: Arc<JobHandlers>,
    pub coordination: Arc<dyn CoordinationStore>,
    pub metrics: Arc<dyn MetricsRecorder>,
}

impl Components {
    pub async fn build(config: AppConfig) -> Result<Self, DocGenError> {
        let pool = sqlite::connect(&config.database.dsn, config.database.max_connections).await?;

        let template_repository = Arc::new(sqlite::SqliteTemplateRepository::new(pool.clone()));
        let template_version_repository = Arc::new(sqlite::SqliteTemplateVersionRepository::new(pool.clone()));
        let section_repository = Arc::new(sqlite::SqliteSectionRepository::new(pool.clone()));
        let generation_input_repository = Arc::new(sqlite::SqliteGenerationInputRepository::new(pool.clone()));
        let section_output_repository = Arc::new(sqlite::SqliteSectionOutputRepository::new(pool.clone()));
        let (assembled_document_repository, rendered_document_repository) = {
            let assembled = Arc::new(sqlite::SqliteAssembledDocumentRepository::new(pool.clone()));
            let rendered = Arc::new(sqlite::SqliteRenderedDocumentRepository::new(pool.clone()));
            (assembled, rendered)
        };
        let document_repository = Arc::new(sqlite::SqliteDocumentRepository::new(pool.clone()));
        let document_version_repository = Arc::new(sqlite::SqliteDocumentVersionRepository::new(pool.clone()));
        let audit_log_repository = Arc::new(sqlite::SqliteAuditLogRepository::new(pool.clone()));
        let job_repository = Arc::new(sqlite::SqliteJobRepository::new(pool.clone()));

        let object_store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(config.object_store.root.clone()));
        let template_parser: Arc<dyn TemplateParser> = Arc::new(PlaintextTemplateParser);
        let llm_client = Arc::new(MockLlmClient);
        let llm_classifier = Arc::new(NoopLlmClassifier);
        let renderer = Arc::new(NullRenderer::new(object_store.clone()));
        let metrics: Arc<dyn MetricsRecorder> = Arc::new(PrometheusMetricsRecorder::new());
        let coordination: Arc<dyn CoordinationStore> = InMemoryCoordinationStore::new();

        let pipeline = Arc::new(PipelineHandler {
            template_version_repository: template_version_repository.clone(),
            section_repository,
            generation_input_repository,
            section_output_repository: section_output_repository.clone(),
            assembled_document_repository,
            rendered_document_repository,
            document_repository: document_repository.clone(),
            document_version_repository: document_version_repository.clone(),
            audit_log_repository,
            object_store: object_store.clone(),
            llm_client,
            renderer,
            metrics: metrics.clone(),
        });

        let classification_service = Arc::new(ClassificationService::new(
            Arc::new(sqlite::SqliteSectionRepository::new(pool.clone())),
            llm_classifier,
            config.classification.confidence_threshold,
            config.classification.use_llm,
        ));

        let job_handlers = Arc::new(JobHandlers {
            template_parser: template_parser.clone(),
            classification_service,
            pipeline: pipeline.clone(),
        });

        Ok(Self {
            config,
            object_store,
            template_repository,
            template_version_repository,
            document_repository,
            document_version_repository,
            job_repository,
            template_parser,
            pipeline,
            job_handlers,
            coordination,
            metrics,
        })
    }

    pub fn worker(&self, worker_id: String) -> Arc<Worker> {
        Arc::new(Worker {
            worker_id,
            job_repository: self.job_repository.clone(),
            handlers: self.job_handlers.clone(),
            coordination: self.coordination.clone(),
            metrics: self.metrics.clone(),
            scheduler: self.config.scheduler.clone(),
            coordination_config: self.config.coordination.clone(),
        })
    }
}
