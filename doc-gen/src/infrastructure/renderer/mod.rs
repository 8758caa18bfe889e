// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Test double for the document renderer (spec §4.7, §1 "out of scope"):
//! serializes the assembled block tree to canonical JSON bytes instead of a
//! real office document format, then reports that artifact's path, hash and
//! size the same way a real renderer would.

use crate::infrastructure::object_store::document_output_key;
use async_trait::async_trait;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::services::{ObjectStore, RenderOutcome, Renderer};
use doc_gen_domain::value_objects::{bytes_hash, Block};
use std::sync::Arc;

pub struct NullRenderer {
    object_store: Arc<dyn ObjectStore>,
}

impl NullRenderer {
    pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
        Self { object_store }
    }
}

#[async_trait]
impl Renderer for NullRenderer {
    async fn render(&self, document_id: &str, version: i64, blocks: &[Block]) -> Result<RenderOutcome, DocGenError> {
        let bytes = serde_json::to_vec(blocks)
            .map_err(|e| DocGenError::internal(format!("rendering serialization failed: {e}")))?;
        let content_hash = bytes_hash(&bytes);
        let file_size = bytes.len() as i64;
        let output_path = document_output_key(document_id, version);

        self.object_store.put(&output_path, bytes, Some("application/json")).await?;

        Ok(RenderOutcome {
            output_path,
            content_hash,
            file_size,
            block_count: blocks.len() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_gen_domain::value_objects::TextRun;
    use tempfile::tempdir;

    #[tokio::test]
    async fn render_is_deterministic_for_the_same_blocks() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(crate::infrastructure::object_store::FsObjectStore::new(dir.path()));
        let renderer = NullRenderer::new(store);

        let blocks = vec![Block::Paragraph {
            block_id: "p1".into(),
            sequence: 0,
            runs: vec![TextRun::plain("hello")],
            formatting: Default::default(),
        }];

        let first = renderer.render("doc-1", 1, &blocks).await.unwrap();
        let second = renderer.render("doc-1", 1, &blocks).await.unwrap();
        assert_eq!(first.content_hash, second.content_hash);
        assert_eq!(first.block_count, 1);
    }
}
