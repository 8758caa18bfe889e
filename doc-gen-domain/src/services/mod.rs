pub mod coordination_store;
pub mod llm_classifier;
pub mod llm_client;
pub mod metrics;
pub mod object_store;
pub mod renderer;
pub mod template_parser;

pub use coordination_store::CoordinationStore;
pub use llm_classifier::{LlmClassification, LlmClassifier};
pub use llm_client::LlmClient;
pub use metrics::{MetricsRecorder, NoopMetricsRecorder};
pub use object_store::ObjectStore;
pub use renderer::{RenderOutcome, Renderer};
pub use template_parser::{ParsedBlocks, TemplateParser};
