// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Document rendering port (spec §4.7). The renderer converting an
//! assembled block tree into a binary office document is explicitly out of
//! scope (spec §1); the core only depends on this trait's contract.

use crate::error::DocGenError;
use crate::value_objects::{Block, HashHex};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub output_path: String,
    pub content_hash: HashHex,
    pub file_size: i64,
    pub block_count: i64,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Must be a pure function of `blocks`; the resulting artifact is
    /// uploaded to object storage under the path `self` returns.
    async fn render(&self, document_id: &str, version: i64, blocks: &[Block]) -> Result<RenderOutcome, DocGenError>;
}
