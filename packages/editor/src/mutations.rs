//! # Document Mutations
//!
//! The edits a user performs on the document, expressed as serializable
//! operations on the tree.
//!
//! ## Mutation Semantics
//!
//! All offsets count characters, not bytes.
//!
//! ### InsertText / RemoveText
//! - Operate inside a single leaf
//! - Offsets past the end of the leaf fail
//!
//! ### SplitBlock
//! - Cuts a block at a leaf offset into two blocks
//! - Both halves keep the block tag and the split leaf's marks
//!
//! ### MergeBlock
//! - Appends a block's leaves to the previous block and drops it
//! - Fails on the first block
//!
//! ### SpliceBlocks / ReplaceDocument
//! - Coarse structural replacement; used as the inverse of the finer edits
//!   and for whole-value changes coming from a widget

use crate::document::{Block, DocumentTree, Leaf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local edit on the document tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert text into a leaf at a character offset
    InsertText {
        block: usize,
        leaf: usize,
        offset: usize,
        text: String,
    },

    /// Remove `len` characters from a leaf starting at `offset`
    RemoveText {
        block: usize,
        leaf: usize,
        offset: usize,
        len: usize,
    },

    /// Split a block in two at a leaf offset
    SplitBlock {
        block: usize,
        leaf: usize,
        offset: usize,
    },

    /// Merge a block into the one before it
    MergeBlock { block: usize },

    /// Replace `remove` blocks starting at `index` with `insert`
    SpliceBlocks {
        index: usize,
        remove: usize,
        insert: Vec<Block>,
    },

    /// Replace the whole document
    ReplaceDocument { document: DocumentTree },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block {0} out of range")]
    BlockOutOfRange(usize),

    #[error("Leaf {leaf} out of range in block {block}")]
    LeafOutOfRange { block: usize, leaf: usize },

    #[error("Offset {offset} out of range for leaf of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Cannot merge the first block")]
    CannotMergeFirstBlock,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Mutation {
    /// Check that this mutation can be applied to the document
    pub fn validate(&self, doc: &DocumentTree) -> Result<(), MutationError> {
        match self {
            Mutation::InsertText { block, leaf, offset, .. } => {
                let target = Self::leaf(doc, *block, *leaf)?;
                Self::check_offset(*offset, target.char_len())
            }

            Mutation::RemoveText { block, leaf, offset, len } => {
                let target = Self::leaf(doc, *block, *leaf)?;
                let end = offset.checked_add(*len).ok_or(MutationError::OffsetOutOfRange {
                    offset: usize::MAX,
                    len: target.char_len(),
                })?;
                Self::check_offset(end, target.char_len())
            }

            Mutation::SplitBlock { block, leaf, offset } => {
                let target = Self::leaf(doc, *block, *leaf)?;
                Self::check_offset(*offset, target.char_len())
            }

            Mutation::MergeBlock { block } => {
                if *block >= doc.block_count() {
                    return Err(MutationError::BlockOutOfRange(*block));
                }
                if *block == 0 {
                    return Err(MutationError::CannotMergeFirstBlock);
                }
                Ok(())
            }

            Mutation::SpliceBlocks { index, remove, insert } => {
                let end = index.checked_add(*remove).ok_or(MutationError::BlockOutOfRange(*index))?;
                if end > doc.block_count() {
                    return Err(MutationError::BlockOutOfRange(end));
                }
                Self::check_blocks(insert)
            }

            Mutation::ReplaceDocument { document } => Self::check_blocks(&document.blocks),
        }
    }

    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut DocumentTree) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::InsertText { block, leaf, offset, text } => {
                let target = &mut doc.blocks[*block].children[*leaf];
                let at = byte_index(&target.text, *offset);
                target.text.insert_str(at, text);
            }

            Mutation::RemoveText { block, leaf, offset, len } => {
                let target = &mut doc.blocks[*block].children[*leaf];
                let start = byte_index(&target.text, *offset);
                let end = byte_index(&target.text, offset + len);
                target.text.replace_range(start..end, "");
            }

            Mutation::SplitBlock { block, leaf, offset } => {
                let original = &mut doc.blocks[*block];
                let mut tail_leaves = original.children.split_off(*leaf + 1);
                let split_leaf = &mut original.children[*leaf];
                let at = byte_index(&split_leaf.text, *offset);
                let tail_text = split_leaf.text.split_off(at);
                tail_leaves.insert(
                    0,
                    Leaf {
                        text: tail_text,
                        marks: split_leaf.marks.clone(),
                    },
                );
                let tail = Block::with_children(original.kind.clone(), tail_leaves);
                doc.blocks.insert(*block + 1, tail);
            }

            Mutation::MergeBlock { block } => {
                let merged = doc.blocks.remove(*block);
                doc.blocks[*block - 1].children.extend(merged.children);
            }

            Mutation::SpliceBlocks { index, remove, insert } => {
                let _removed: Vec<Block> = doc
                    .blocks
                    .splice(*index..*index + *remove, insert.iter().cloned())
                    .collect();
            }

            Mutation::ReplaceDocument { document } => {
                *doc = document.clone();
            }
        }

        Ok(())
    }

    /// Build the mutation that undoes this one.
    ///
    /// Must be called against the document as it was before `apply`.
    pub fn to_inverse(&self, doc: &DocumentTree) -> Result<Mutation, MutationError> {
        self.validate(doc)?;

        let inverse = match self {
            Mutation::InsertText { block, leaf, offset, text } => Mutation::RemoveText {
                block: *block,
                leaf: *leaf,
                offset: *offset,
                len: text.chars().count(),
            },

            Mutation::RemoveText { block, leaf, offset, len } => {
                let removed: String = doc.blocks[*block].children[*leaf]
                    .text
                    .chars()
                    .skip(*offset)
                    .take(*len)
                    .collect();
                Mutation::InsertText {
                    block: *block,
                    leaf: *leaf,
                    offset: *offset,
                    text: removed,
                }
            }

            Mutation::SplitBlock { block, .. } => Mutation::SpliceBlocks {
                index: *block,
                remove: 2,
                insert: vec![doc.blocks[*block].clone()],
            },

            Mutation::MergeBlock { block } => Mutation::SpliceBlocks {
                index: *block - 1,
                remove: 1,
                insert: vec![doc.blocks[*block - 1].clone(), doc.blocks[*block].clone()],
            },

            Mutation::SpliceBlocks { index, remove, insert } => Mutation::SpliceBlocks {
                index: *index,
                remove: insert.len(),
                insert: doc.blocks[*index..*index + *remove].to_vec(),
            },

            Mutation::ReplaceDocument { .. } => Mutation::ReplaceDocument {
                document: doc.clone(),
            },
        };

        Ok(inverse)
    }

    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertText { .. } => "insert_text",
            Mutation::RemoveText { .. } => "remove_text",
            Mutation::SplitBlock { .. } => "split_block",
            Mutation::MergeBlock { .. } => "merge_block",
            Mutation::SpliceBlocks { .. } => "splice_blocks",
            Mutation::ReplaceDocument { .. } => "replace_document",
        }
    }

    fn leaf(doc: &DocumentTree, block: usize, leaf: usize) -> Result<&Leaf, MutationError> {
        doc.block(block)
            .ok_or(MutationError::BlockOutOfRange(block))?
            .children
            .get(leaf)
            .ok_or(MutationError::LeafOutOfRange { block, leaf })
    }

    /// Every block needs at least one leaf
    fn check_blocks(blocks: &[Block]) -> Result<(), MutationError> {
        match blocks.iter().position(|b| b.children.is_empty()) {
            Some(index) => Err(MutationError::InvalidStructure(format!(
                "Block {} has no leaves",
                index
            ))),
            None => Ok(()),
        }
    }

    fn check_offset(offset: usize, len: usize) -> Result<(), MutationError> {
        if offset > len {
            Err(MutationError::OffsetOutOfRange { offset, len })
        } else {
            Ok(())
        }
    }
}

/// Byte position of the `chars`-th character (or the end of the string)
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
