pub mod assembled_document;
pub mod audit_log;
pub mod document;
pub mod document_version;
pub mod generation_input;
pub mod job;
pub mod rendered_document;
pub mod section;
pub mod section_output;
pub mod template;
pub mod template_version;

pub use assembled_document::{AssembledDocument, InjectionResult};
pub use audit_log::{AuditAction, AuditEntityType, AuditLog};
pub use document::Document;
pub use document_version::{DocumentVersion, GenerationMetadata};
pub use generation_input::{GenerationInput, GenerationInputBatch};
pub use job::{Job, JobPayload};
pub use rendered_document::RenderedDocument;
pub use section::Section;
pub use section_output::{SectionOutput, SectionOutputBatch};
pub use template::Template;
pub use template_version::TemplateVersion;
