// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! CLI entry point for the document generation worker: parses a subcommand,
//! wires the component graph through [`wiring::Components`], and either runs
//! a one-shot repository operation or starts the job-queue worker loop.

mod wiring;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_gen::config::AppConfig;
use doc_gen::infrastructure::runtime::shutdown::ShutdownCoordinator;
use doc_gen_domain::entities::{Document, Job, JobPayload, Template, TemplateVersion};
use doc_gen_domain::repositories::{DocumentRepository, DocumentVersionRepository, JobRepository, TemplateRepository, TemplateVersionRepository};
use doc_gen_domain::value_objects::{DocumentId, SectionId, TemplateVersionId};
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;
use wiring::Components;

#[derive(Parser)]
#[command(name = "doc-gen-bootstrap")]
#[command(about = "Document generation worker: job queue, five-stage pipeline, classification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the job-queue worker loop until SIGINT/SIGTERM.
    Worker {
        /// Worker identity recorded on claimed jobs and heartbeats.
        #[arg(long, default_value = "worker-1")]
        worker_id: String,
    },

    /// Register a new template and its first version from a source file,
    /// then enqueue a PARSE job for it.
    UploadTemplate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        file: PathBuf,
    },

    /// Create a document bound to a completed template version.
    CreateDocument {
        #[arg(long)]
        template_version_id: TemplateVersionId,
    },

    /// Enqueue a CLASSIFY job for a parsed template version.
    EnqueueClassify {
        #[arg(long)]
        template_version_id: TemplateVersionId,
    },

    /// Enqueue a GENERATE job for a document's first version.
    EnqueueGenerate {
        #[arg(long)]
        template_version_id: TemplateVersionId,
        #[arg(long)]
        document_id: DocumentId,
        #[arg(long)]
        version_intent: Option<i64>,
        /// Inline JSON for the client data snapshot (defaults to `null`).
        #[arg(long)]
        client_data: Option<String>,
    },

    /// Enqueue a REGENERATE job, producing a new full version of a document.
    EnqueueRegenerate {
        #[arg(long)]
        document_id: DocumentId,
        #[arg(long)]
        version_intent: i64,
        #[arg(long)]
        client_data: Option<String>,
    },

    /// Enqueue a REGENERATE_SECTIONS job, reusing validated content for
    /// `reuse_section_ids` and regenerating `section_ids`.
    EnqueueRegenerateSections {
        #[arg(long)]
        document_id: DocumentId,
        #[arg(long)]
        version_intent: i64,
        #[arg(long, value_delimiter = ',')]
        section_ids: Vec<i64>,
        #[arg(long, value_delimiter = ',', default_value = "")]
        reuse_section_ids: Vec<i64>,
        #[arg(long)]
        client_data: Option<String>,
    },

    /// Print a document's current version pointer and its version history.
    ShowDocument {
        #[arg(long)]
        document_id: DocumentId,
    },

    /// Re-derive a stored version's content hash and compare it to the
    /// recorded one (spec §4.8 integrity check).
    VerifyVersion {
        #[arg(long)]
        document_id: DocumentId,
        #[arg(long)]
        version_number: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;
    doc_gen::logging::init_logging(&config.logging);

    let components = Components::build(config).await.context("wiring components")?;

    match cli.command {
        Commands::Worker { worker_id } => run_worker(components, worker_id).await,
        Commands::UploadTemplate { name, file } => upload_template(&components, name, file).await,
        Commands::CreateDocument { template_version_id } => create_document(&components, template_version_id).await,
        Commands::EnqueueClassify { template_version_id } => {
            let job_id = components.job_repository.enqueue(&JobPayload::Classify { template_version_id }).await?;
            println!("enqueued classify job {job_id}");
            Ok(())
        }
        Commands::EnqueueGenerate {
            template_version_id,
            document_id,
            version_intent,
            client_data,
        } => {
            let payload = JobPayload::Generate {
                template_version_id,
                document_id,
                version_intent,
                client_data: parse_client_data(client_data)?,
            };
            let job_id = components.job_repository.enqueue(&payload).await?;
            println!("enqueued generate job {job_id}");
            Ok(())
        }
        Commands::EnqueueRegenerate {
            document_id,
            version_intent,
            client_data,
        } => {
            let payload = JobPayload::Regenerate {
                document_id,
                version_intent,
                client_data: parse_client_data(client_data)?,
                correlation_id: None,
            };
            let job_id = components.job_repository.enqueue(&payload).await?;
            println!("enqueued regenerate job {job_id}");
            Ok(())
        }
        Commands::EnqueueRegenerateSections {
            document_id,
            version_intent,
            section_ids,
            reuse_section_ids,
            client_data,
        } => {
            let payload = JobPayload::RegenerateSections {
                document_id,
                template_version_id: None,
                version_intent,
                section_ids: section_ids.into_iter().map(SectionId::new).collect(),
                reuse_section_ids: reuse_section_ids.into_iter().map(SectionId::new).collect(),
                client_data: parse_client_data(client_data)?,
                correlation_id: None,
            };
            let job_id = components.job_repository.enqueue(&payload).await?;
            println!("enqueued regenerate-sections job {job_id}");
            Ok(())
        }
        Commands::ShowDocument { document_id } => show_document(&components, document_id).await,
        Commands::VerifyVersion { document_id, version_number } => verify_version(&components, document_id, version_number).await,
    }
}

fn parse_client_data(raw: Option<String>) -> Result<Option<Value>> {
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s).context("parsing --client-data as JSON")?)),
        None => Ok(None),
    }
}

async fn upload_template(components: &Components, name: String, file: PathBuf) -> Result<()> {
    let bytes = tokio::fs::read(&file).await.with_context(|| format!("reading {}", file.display()))?;

    let template = Template::new(name);
    components.template_repository.save(&template).await?;

    let source_path = doc_gen::infrastructure::object_store::template_source_key(&template.id.to_string(), 1);
    components.object_store.put(&source_path, bytes, None).await?;

    let version = TemplateVersion::new(template.id, 1, source_path);
    components.template_version_repository.save(&version).await?;

    let job_id = components
        .job_repository
        .enqueue(&JobPayload::Parse {
            template_version_id: version.id,
        })
        .await?;

    println!("template {} version {} created; enqueued parse job {job_id}", template.id, version.id);
    Ok(())
}

async fn create_document(components: &Components, template_version_id: TemplateVersionId) -> Result<()> {
    components
        .template_version_repository
        .find_by_id(template_version_id)
        .await?
        .with_context(|| format!("template version {template_version_id} not found"))?;

    let document = Document::new(template_version_id);
    components.document_repository.save(&document).await?;
    println!("document {}", document.id);
    Ok(())
}

async fn show_document(components: &Components, document_id: DocumentId) -> Result<()> {
    let document = components
        .document_repository
        .find_by_id(document_id)
        .await?
        .with_context(|| format!("document {document_id} not found"))?;
    println!("document {} current_version={}", document.id, document.current_version);

    for version in components.document_version_repository.find_by_document(document_id).await? {
        println!(
            "  version {} output={} content_hash={} created_at={}",
            version.version_number, version.output_path, version.generation_metadata.content_hash, version.created_at
        );
    }
    Ok(())
}

async fn verify_version(components: &Components, document_id: DocumentId, version_number: i64) -> Result<()> {
    let ok = doc_gen::pipeline::versioning::verify(&components.pipeline, document_id, version_number).await?;
    if ok {
        println!("version {version_number} of document {document_id}: content hash matches");
    } else {
        println!("version {version_number} of document {document_id}: CONTENT HASH MISMATCH");
        std::process::exit(1);
    }
    Ok(())
}

/// Runs the worker loop, driving shutdown from SIGINT/SIGTERM (spec §5).
async fn run_worker(components: Components, worker_id: String) -> Result<()> {
    let worker = components.worker(worker_id);
    let coordinator = ShutdownCoordinator::default();
    let token = coordinator.token();

    let run_handle = tokio::spawn({
        let worker = worker.clone();
        let token = token.clone();
        async move { worker.run(token).await }
    });

    wait_for_termination().await;
    tracing::info!("shutdown signal received");
    coordinator.initiate_shutdown();

    match run_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "worker loop exited with error"),
        Err(e) => tracing::error!(error = %e, "worker task panicked"),
    }
    coordinator.complete_shutdown();

    Ok(())
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}

#[allow(dead_code)]
fn _job_status_is_exhaustive(_j: Job) {}
