// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Block Model
//!
//! In-memory tree of typed blocks (spec §2, §6 "Parsed-document format").
//! Expressed as a tagged-variant enum rather than a class hierarchy, per
//! spec §9's redesign note on the source's discriminated union: one
//! `block_type` tag, one `Serialize` impl keyed on that tag (the `#[serde
//! (tag = "block_type")]` attribute does the field-for-field job that the
//! Python original's `ContentInjector._serialize_block` does by hand).

use crate::value_objects::hashing::{text_hash, HashHex};
use serde::{Deserialize, Serialize};

/// A single styled run of text within a paragraph or heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strike: bool,
    pub font: Option<String>,
    pub color: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            font: None,
            color: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormatting {
    pub alignment: Option<String>,
    pub indent_left: Option<f64>,
    pub indent_right: Option<f64>,
    pub space_before: Option<f64>,
    pub space_after: Option<f64>,
    pub style_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingFormatting {
    pub level: u8,
    pub alignment: Option<String>,
    pub style_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub runs: Vec<TextRun>,
    #[serde(default)]
    pub level: u8,
}

/// One typed block, discriminated by `block_type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block_type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        block_id: String,
        sequence: u32,
        runs: Vec<TextRun>,
        formatting: ParagraphFormatting,
    },
    Heading {
        block_id: String,
        sequence: u32,
        runs: Vec<TextRun>,
        formatting: HeadingFormatting,
    },
    Table {
        block_id: String,
        sequence: u32,
        rows: Vec<TableRow>,
    },
    List {
        block_id: String,
        sequence: u32,
        items: Vec<ListItem>,
    },
    Header {
        block_id: String,
        sequence: u32,
        runs: Vec<TextRun>,
    },
    Footer {
        block_id: String,
        sequence: u32,
        runs: Vec<TextRun>,
    },
    PageBreak {
        block_id: String,
        sequence: u32,
    },
}

impl Block {
    pub fn block_id(&self) -> &str {
        match self {
            Block::Paragraph { block_id, .. }
            | Block::Heading { block_id, .. }
            | Block::Table { block_id, .. }
            | Block::List { block_id, .. }
            | Block::Header { block_id, .. }
            | Block::Footer { block_id, .. }
            | Block::PageBreak { block_id, .. } => block_id,
        }
    }

    pub fn sequence(&self) -> u32 {
        match self {
            Block::Paragraph { sequence, .. }
            | Block::Heading { sequence, .. }
            | Block::Table { sequence, .. }
            | Block::List { sequence, .. }
            | Block::Header { sequence, .. }
            | Block::Footer { sequence, .. }
            | Block::PageBreak { sequence, .. } => *sequence,
        }
    }

    /// `body/block/{sequence}` — the structural path used to address this
    /// block from a `Section` row (spec §4.6).
    pub fn structural_path(&self) -> String {
        format!("body/block/{}", self.sequence())
    }

    pub fn block_type_tag(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading { .. } => "heading",
            Block::Table { .. } => "table",
            Block::List { .. } => "list",
            Block::Header { .. } => "header",
            Block::Footer { .. } => "footer",
            Block::PageBreak { .. } => "page_break",
        }
    }

    fn runs_text(runs: &[TextRun]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().concat()
    }

    /// Block content hash per spec §4.1:
    /// - paragraph/heading: concatenated text of its runs
    /// - table: literal `table:{rows}x{cols}`
    /// - list: items' text joined with `|`
    /// - otherwise: the block-id
    pub fn content_hash(&self) -> HashHex {
        match self {
            Block::Paragraph { runs, .. } | Block::Heading { runs, .. } => text_hash(&Self::runs_text(runs)),
            Block::Table { rows, .. } => {
                let cols = rows.first().map(|r| r.cells.len()).unwrap_or(0);
                text_hash(&format!("table:{}x{}", rows.len(), cols))
            }
            Block::List { items, .. } => {
                let joined = items
                    .iter()
                    .map(|item| Self::runs_text(&item.runs))
                    .collect::<Vec<_>>()
                    .join("|");
                text_hash(&joined)
            }
            other => text_hash(other.block_id()),
        }
    }

    /// Replace this block's runs with a single run carrying `content`,
    /// preserving every other formatting attribute. Only meaningful for
    /// paragraph/heading blocks (spec §4.6's injection substitution rule);
    /// returns `None` for any other block type.
    pub fn with_injected_content(&self, content: &str) -> Option<Block> {
        match self {
            Block::Paragraph {
                block_id,
                sequence,
                formatting,
                ..
            } => Some(Block::Paragraph {
                block_id: block_id.clone(),
                sequence: *sequence,
                runs: vec![TextRun::plain(content)],
                formatting: formatting.clone(),
            }),
            Block::Heading {
                block_id,
                sequence,
                formatting,
                ..
            } => Some(Block::Heading {
                block_id: block_id.clone(),
                sequence: *sequence,
                runs: vec![TextRun::plain(content)],
                formatting: formatting.clone(),
            }),
            _ => None,
        }
    }

    /// Whether this block type supports dynamic content injection at all
    /// (spec §4.6: "any other block type: preserve the block unchanged").
    pub fn supports_injection(&self) -> bool {
        matches!(self, Block::Paragraph { .. } | Block::Heading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_content_hash_depends_on_run_text_only() {
        let a = Block::Paragraph {
            block_id: "b1".into(),
            sequence: 0,
            runs: vec![TextRun::plain("hello")],
            formatting: ParagraphFormatting {
                alignment: Some("left".into()),
                indent_left: None,
                indent_right: None,
                space_before: None,
                space_after: None,
                style_name: None,
            },
        };
        let b = Block::Paragraph {
            block_id: "b1".into(),
            sequence: 0,
            runs: vec![TextRun::plain("hello")],
            formatting: ParagraphFormatting {
                alignment: Some("right".into()),
                indent_left: None,
                indent_right: None,
                space_before: None,
                space_after: None,
                style_name: None,
            },
        };
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn table_content_hash_is_dimensions_only() {
        let t = Block::Table {
            block_id: "t1".into(),
            sequence: 1,
            rows: vec![TableRow {
                cells: vec![TableCell { runs: vec![] }, TableCell { runs: vec![] }],
            }],
        };
        assert_eq!(t.content_hash(), text_hash("table:1x2"));
    }

    #[test]
    fn injection_preserves_formatting() {
        let p = Block::Paragraph {
            block_id: "b1".into(),
            sequence: 0,
            runs: vec![TextRun::plain("old")],
            formatting: ParagraphFormatting {
                alignment: Some("center".into()),
                indent_left: Some(10.0),
                indent_right: None,
                space_before: None,
                space_after: None,
                style_name: Some("Body".into()),
            },
        };
        let injected = p.with_injected_content("new").unwrap();
        if let Block::Paragraph { runs, formatting, .. } = injected {
            assert_eq!(runs.len(), 1);
            assert_eq!(runs[0].text, "new");
            assert_eq!(formatting.alignment.as_deref(), Some("center"));
            assert_eq!(formatting.style_name.as_deref(), Some("Body"));
        } else {
            panic!("expected paragraph");
        }
    }

    #[test]
    fn page_break_does_not_support_injection() {
        let pb = Block::PageBreak {
            block_id: "pb1".into(),
            sequence: 2,
        };
        assert!(!pb.supports_injection());
        assert!(pb.with_injected_content("x").is_none());
    }
}
