pub mod assembly_error;
pub mod block;
pub mod hashing;
pub mod ids;
pub mod parsed_document;
pub mod pipeline_state;
pub mod snapshot;
pub mod statuses;
pub mod versioning_error;

pub use assembly_error::AssemblyErrorCode;
pub use block::{Block, HeadingFormatting, ListItem, ParagraphFormatting, TableCell, TableRow, TextRun};
pub use hashing::{assembly_hash, batch_hash, bytes_hash, canonical_json_hash, text_hash, HashHex};
pub use ids::*;
pub use parsed_document::ParsedDocument;
pub use pipeline_state::{PipelineStage, PipelineState};
pub use snapshot::{ClientData, GenerationInputSnapshot, HierarchyContext, PromptConfig, SurroundingContext};
pub use statuses::*;
pub use versioning_error::VersioningErrorCode;
