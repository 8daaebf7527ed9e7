//! # Text Bridge
//!
//! Conversion between the host's line-oriented text and the document tree.
//!
//! Both directions are total: any string produces a tree and any tree
//! produces a string. Only plain text survives the trip; block tags, leaf
//! boundaries and marks are dropped by `serialize`.

use crate::document::{Block, DocumentTree};

/// Separator between serialized blocks
pub const LINE_SEPARATOR: char = '\n';

/// Tag used for the single-paragraph shape
pub const PARAGRAPH: &str = "paragraph";

/// Flatten a tree into text, one line per block
pub fn serialize(doc: &DocumentTree) -> String {
    let mut out = String::new();
    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 {
            out.push(LINE_SEPARATOR);
        }
        out.push_str(&block_text(block));
    }
    out
}

/// Build a tree with one untagged single-leaf block per line.
///
/// Empty lines are kept, so `""` yields one block holding an empty leaf.
pub fn deserialize(text: &str) -> DocumentTree {
    DocumentTree::from_blocks(text.split(LINE_SEPARATOR).map(Block::line).collect())
}

/// Wrap text verbatim in a single tagged paragraph, without splitting lines
pub fn paragraph(text: &str) -> DocumentTree {
    DocumentTree::from_blocks(vec![Block::tagged(PARAGRAPH, text)])
}

/// Concatenated leaf text of one block
pub fn block_text(block: &Block) -> String {
    block.text()
}

/// Whether `deserialize(serialize(doc))` gives back `doc` exactly
pub fn is_lossless(doc: &DocumentTree) -> bool {
    // An empty tree serializes to "" which comes back as one empty line.
    !doc.is_empty() && deserialize(&serialize(doc)) == *doc
}
