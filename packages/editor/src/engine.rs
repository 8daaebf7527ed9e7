//! # Editor Engine
//!
//! Narrow interface over the component that owns the document and performs
//! local edits. The mount only ever reads the document, replaces it, applies
//! edits and listens for changes, so any editing engine (a native one, or a
//! widget living on the page) can sit behind it.
//!
//! ## Change notification
//!
//! ```text
//! apply / undo / redo ──► state updated ──► every subscriber called once
//! set_document        ──► state updated     (no notification)
//! ```

use crate::document::DocumentTree;
use crate::mutations::{Mutation, MutationError};
use crate::undo_stack::UndoStack;

/// Callback run after every local change
pub type ChangeListener = Box<dyn FnMut(&DocumentTree)>;

/// Handle returned by [`EditorEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait EditorEngine {
    /// Current document
    fn document(&self) -> &DocumentTree;

    /// Replace the document from outside; subscribers are not notified
    fn set_document(&mut self, doc: DocumentTree);

    fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Apply a local edit and notify subscribers
    fn apply(&mut self, mutation: Mutation) -> Result<(), MutationError>;

    /// Undo the last local edit. Returns false when there is nothing to undo.
    fn undo(&mut self) -> Result<bool, MutationError> {
        Ok(false)
    }

    /// Redo the last undone edit. Returns false when there is nothing to redo.
    fn redo(&mut self) -> Result<bool, MutationError> {
        Ok(false)
    }
}

/// Listener registry shared by engine implementations
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Call every listener in subscription order
    pub fn notify(&mut self, doc: &DocumentTree) {
        for (_, listener) in &mut self.listeners {
            listener(doc);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}

/// Native engine with undo/redo history
#[derive(Debug)]
pub struct HistoryEditor {
    document: DocumentTree,
    history: UndoStack,
    subscribers: Subscribers,
}

impl HistoryEditor {
    pub fn new() -> Self {
        Self::with_history(UndoStack::new())
    }

    pub fn with_history(history: UndoStack) -> Self {
        Self {
            document: DocumentTree::empty(),
            history,
            subscribers: Subscribers::new(),
        }
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    fn notify(&mut self) {
        tracing::trace!(listeners = self.subscribers.len(), "notifying change subscribers");
        self.subscribers.notify(&self.document);
    }
}

impl Default for HistoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorEngine for HistoryEditor {
    fn document(&self) -> &DocumentTree {
        &self.document
    }

    fn set_document(&mut self, doc: DocumentTree) {
        self.document = doc;
        // Recorded inverses refer to the old document
        self.history.clear();
    }

    fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        self.subscribers.add(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn apply(&mut self, mutation: Mutation) -> Result<(), MutationError> {
        tracing::debug!(op = mutation.name(), "applying local edit");
        self.history.apply(&mutation, &mut self.document)?;
        self.notify();
        Ok(())
    }

    fn undo(&mut self) -> Result<bool, MutationError> {
        let undone = self.history.undo(&mut self.document)?;
        if undone {
            self.notify();
        }
        Ok(undone)
    }

    fn redo(&mut self) -> Result<bool, MutationError> {
        let redone = self.history.redo(&mut self.document)?;
        if redone {
            self.notify();
        }
        Ok(redone)
    }
}
