//! # Undo/Redo Stack
//!
//! Tracks edit history and enables undo/redo.
//!
//! ## Design
//!
//! - Each mutation records its inverse before being applied
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the recorded mutations
//! - A batch that fails part way through leaves the document unchanged
//! - New mutations clear the redo stack
//! - Batches group several mutations into one undo step
//!
//! ## Example
//!
//! ```rust
//! use commonplace_editor::{bridge, Mutation, UndoStack};
//!
//! let mut doc = bridge::deserialize("hello");
//! let mut stack = UndoStack::new();
//!
//! let edit = Mutation::InsertText { block: 0, leaf: 0, offset: 5, text: "!".into() };
//! stack.apply(&edit, &mut doc).unwrap();
//! assert_eq!(bridge::serialize(&doc), "hello!");
//!
//! stack.undo(&mut doc).unwrap();
//! assert_eq!(bridge::serialize(&doc), "hello");
//!
//! stack.redo(&mut doc).unwrap();
//! assert_eq!(bridge::serialize(&doc), "hello!");
//! ```

use crate::document::DocumentTree;
use crate::mutations::{Mutation, MutationError};

/// Default number of undo levels kept
pub const DEFAULT_MAX_LEVELS: usize = 100;

/// A group of mutations that are undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// The inverse mutations (in reverse order for undo)
    pub inverses: Vec<Mutation>,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    /// Create a single-mutation batch
    pub fn single(mutation: Mutation, inverse: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            inverses: vec![inverse],
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Batch being built, if any
    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: &Mutation, doc: &mut DocumentTree) -> Result<(), MutationError> {
        let inverse = mutation.to_inverse(doc)?;
        mutation.apply(doc)?;

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation.clone());
            batch.inverses.insert(0, inverse);
        } else {
            self.push_batch(MutationBatch::single(mutation.clone(), inverse));
        }

        Ok(())
    }

    /// Start a batch of mutations (undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(MutationBatch {
            mutations: Vec::new(),
            inverses: Vec::new(),
            description: None,
        });
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.mutations.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for the current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Undo the most recent batch. Returns false when there is nothing to undo.
    ///
    /// An open batch is closed first. The document is only changed when every
    /// inverse in the batch applies.
    pub fn undo(&mut self, doc: &mut DocumentTree) -> Result<bool, MutationError> {
        self.end_batch();
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };

        match apply_all(&batch.inverses, doc) {
            Ok(next) => {
                *doc = next;
                self.redo_stack.push(batch);
                Ok(true)
            }
            Err(e) => {
                self.undo_stack.push(batch);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone batch. Returns false when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut DocumentTree) -> Result<bool, MutationError> {
        self.end_batch();
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };

        match apply_all(&batch.mutations, doc) {
            Ok(next) => {
                *doc = next;
                self.undo_stack.push(batch);
                Ok(true)
            }
            Err(e) => {
                self.redo_stack.push(batch);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Description of the next undo step
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Description of the next redo step
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

/// Apply mutations in order to a copy of the document
fn apply_all(mutations: &[Mutation], doc: &DocumentTree) -> Result<DocumentTree, MutationError> {
    let mut next = doc.clone();
    for mutation in mutations {
        mutation.apply(&mut next)?;
    }
    Ok(next)
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
