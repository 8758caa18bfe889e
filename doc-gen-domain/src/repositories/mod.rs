pub mod assembled_document_repository;
pub mod audit_log_repository;
pub mod document_repository;
pub mod document_version_repository;
pub mod generation_input_repository;
pub mod job_repository;
pub mod section_output_repository;
pub mod section_repository;
pub mod template_repository;

pub use assembled_document_repository::{AssembledDocumentRepository, RenderedDocumentRepository};
pub use audit_log_repository::AuditLogRepository;
pub use document_repository::DocumentRepository;
pub use document_version_repository::DocumentVersionRepository;
pub use generation_input_repository::GenerationInputRepository;
pub use job_repository::JobRepository;
pub use section_output_repository::SectionOutputRepository;
pub use section_repository::SectionRepository;
pub use template_repository::{TemplateRepository, TemplateVersionRepository};
