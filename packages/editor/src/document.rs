//! # Document Tree
//!
//! In-memory representation of the editable rich text.
//!
//! A document is an ordered list of blocks, each block an ordered list of
//! leaves, each leaf a run of plain text with optional formatting marks.
//!
//! ```text
//! DocumentTree
//!   ├─ Block (type: "paragraph")
//!   │    ├─ Leaf "Hello "
//!   │    └─ Leaf "world" { bold: true }
//!   └─ Block
//!        └─ Leaf ""
//! ```
//!
//! The serde shape matches the value the page's editor widget works with, so
//! a tree can cross the wasm boundary as JSON unchanged:
//!
//! ```json
//! [{"type":"paragraph","children":[{"text":"Hello "},{"text":"world","bold":true}]}]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest unit of text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Literal text of this run
    pub text: String,

    /// Formatting marks (e.g. `"bold": true`), kept but never interpreted
    #[serde(flatten)]
    pub marks: BTreeMap<String, serde_json::Value>,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: BTreeMap::new(),
        }
    }

    /// Attach a boolean mark
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.marks.insert(mark.into(), serde_json::Value::Bool(true));
        self
    }

    /// Number of characters in the leaf
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Structural unit (e.g. paragraph) holding one or more leaves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block type tag, absent for plain lines
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Leaves in reading order
    #[serde(default)]
    pub children: Vec<Leaf>,
}

impl Block {
    /// Untagged block with a single leaf
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            kind: None,
            children: vec![Leaf::new(text)],
        }
    }

    /// Tagged block with a single leaf
    pub fn tagged(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            children: vec![Leaf::new(text)],
        }
    }

    pub fn with_children(kind: Option<String>, children: Vec<Leaf>) -> Self {
        Self { kind, children }
    }

    /// Concatenated text of every leaf
    pub fn text(&self) -> String {
        self.children.iter().map(|leaf| leaf.text.as_str()).collect()
    }
}

/// Ordered sequence of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTree {
    pub blocks: Vec<Block>,
}

impl DocumentTree {
    /// Document with no blocks at all
    pub fn empty() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Every block has at least one leaf
    pub fn is_well_formed(&self) -> bool {
        self.blocks.iter().all(|block| !block.children.is_empty())
    }

    /// Give every leafless block an empty leaf.
    ///
    /// Returns the number of blocks that were fixed.
    pub fn normalize(&mut self) -> usize {
        let mut fixed = 0;
        for block in &mut self.blocks {
            if block.children.is_empty() {
                block.children.push(Leaf::default());
                fixed += 1;
            }
        }
        fixed
    }

    /// Parse the widget's JSON value
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode as the widget's JSON value
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
