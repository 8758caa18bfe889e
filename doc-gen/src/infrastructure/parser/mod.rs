// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Conservative default `TemplateParser` (spec §1 "out of scope": the
//! low-level binary-office-format parser). Treats `source_bytes` as UTF-8
//! text and splits it into paragraph blocks on blank lines, the same
//! deterministic-stand-in idiom as `MockLlmClient`/`NullRenderer` for the
//! other collaborators this system treats as external.

use async_trait::async_trait;
use doc_gen_domain::error::DocGenError;
use doc_gen_domain::services::{ParsedBlocks, TemplateParser};
use doc_gen_domain::value_objects::{Block, ParagraphFormatting, TemplateId, TemplateVersionId, TextRun};

pub struct PlaintextTemplateParser;

#[async_trait]
impl TemplateParser for PlaintextTemplateParser {
    async fn parse(
        &self,
        _template_id: TemplateId,
        template_version_id: TemplateVersionId,
        source_bytes: &[u8],
    ) -> Result<ParsedBlocks, DocGenError> {
        let text = std::str::from_utf8(source_bytes)
            .map_err(|e| DocGenError::internal(format!("template source is not valid UTF-8: {e}")))?;

        let blocks = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .enumerate()
            .map(|(i, paragraph)| Block::Paragraph {
                block_id: format!("{template_version_id}-p{i}"),
                sequence: i as u32,
                runs: vec![TextRun::plain(paragraph)],
                formatting: ParagraphFormatting::default(),
            })
            .collect();

        Ok(ParsedBlocks {
            blocks,
            headers: Vec::new(),
            footers: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn splits_on_blank_lines_and_is_deterministic() {
        let parser = PlaintextTemplateParser;
        let template_id = TemplateId::new();
        let version_id = TemplateVersionId::new();
        let source = b"First paragraph.\n\nSecond paragraph.\n\n\n";

        let first = parser.parse(template_id, version_id, source).await.unwrap();
        let second = parser.parse(template_id, version_id, source).await.unwrap();

        assert_eq!(first.blocks.len(), 2);
        assert_eq!(second.blocks, first.blocks);
    }

    #[tokio::test]
    async fn rejects_non_utf8_source() {
        let parser = PlaintextTemplateParser;
        let result = parser.parse(TemplateId::new(), TemplateVersionId::new(), &[0xff, 0xfe]).await;
        assert!(result.is_err());
    }
}
