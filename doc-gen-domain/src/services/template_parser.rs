// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Template parsing port (spec §4's PARSE job, §1 "out of scope"). The
//! low-level parser that converts a binary office document into the block
//! tree is explicitly out of scope; the core only depends on this trait's
//! contract.

use crate::error::DocGenError;
use crate::value_objects::{Block, TemplateId, TemplateVersionId};
use async_trait::async_trait;

pub struct ParsedBlocks {
    pub blocks: Vec<Block>,
    pub headers: Vec<Block>,
    pub footers: Vec<Block>,
}

#[async_trait]
pub trait TemplateParser: Send + Sync {
    /// Must be a pure function of `source_bytes`: reparsing identical bytes
    /// yields block-for-block identical output (spec §4.1's content-hash
    /// scheme depends on this).
    async fn parse(
        &self,
        template_id: TemplateId,
        template_version_id: TemplateVersionId,
        source_bytes: &[u8],
    ) -> Result<ParsedBlocks, DocGenError>;
}
