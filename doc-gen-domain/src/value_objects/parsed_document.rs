// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Parsed-template artifact (spec §6 "Parsed-document format"). Not a row —
//! serialized to object storage at `templates/{template-id}/{version}/
//! parsed.json` and referenced by `TemplateVersion::parsed_path`.

use crate::value_objects::hashing::HashHex;
use crate::value_objects::{Block, TemplateId, TemplateVersionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub template_version_id: TemplateVersionId,
    pub template_id: TemplateId,
    pub version_number: i64,
    pub content_hash: HashHex,
    #[serde(default)]
    pub metadata: Value,
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub headers: Vec<Block>,
    #[serde(default)]
    pub footers: Vec<Block>,
}

impl ParsedDocument {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn footer_count(&self) -> usize {
        self.footers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{text_hash, ParagraphFormatting, TextRun};

    #[test]
    fn round_trips_through_json() {
        let doc = ParsedDocument {
            template_version_id: TemplateVersionId::new(),
            template_id: TemplateId::new(),
            version_number: 1,
            content_hash: text_hash("x"),
            metadata: Value::Null,
            blocks: vec![Block::Paragraph {
                block_id: "p1".into(),
                sequence: 0,
                runs: vec![TextRun::plain("hello")],
                formatting: ParagraphFormatting::default(),
            }],
            headers: vec![],
            footers: vec![],
        };
        let raw = serde_json::to_vec(&doc).unwrap();
        let back: ParsedDocument = serde_json::from_slice(&raw).unwrap();
        assert_eq!(back.block_count(), 1);
        assert_eq!(back.content_hash, doc.content_hash);
    }
}
