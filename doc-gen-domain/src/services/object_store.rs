// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Object Store Port
//!
//! ## Architecture Note - Infrastructure Port
//!
//! Like the teacher's `FileIOService`, this is an async infrastructure-port
//! trait living in an otherwise-sync domain crate: object storage is
//! unavoidably I/O-bound, and the pipeline handler (in the application
//! crate) is the only caller, so the async boundary costs nothing in terms
//! of domain purity. Key layout is deterministic (spec §6):
//!
//! ```text
//! templates/{template_id}/{version}/source.docx
//! templates/{template_id}/{version}/parsed.json
//! documents/{document_id}/{version}/output.docx
//! ```

use crate::error::DocGenError;
use async_trait::async_trait;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<(), DocGenError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DocGenError>;
    async fn exists(&self, key: &str) -> Result<bool, DocGenError>;
    async fn delete(&self, key: &str) -> Result<bool, DocGenError>;
}
