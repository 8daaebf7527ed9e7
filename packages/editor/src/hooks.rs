//! # Host Hooks
//!
//! The contract between the editor and the host application.
//!
//! Text flows in through [`EditorMount::push_text`](crate::EditorMount::push_text)
//! and out through [`HostHooks::on_change`]. Everything runs on the page's
//! single event loop, so hooks take `&self` and are shared as `Rc<dyn HostHooks>`;
//! implementations that keep state use interior mutability.

use std::cell::{Cell, RefCell};

/// Receiver for text produced by local edits
pub trait HostHooks {
    /// Called with the serialized document after every local change
    fn on_change(&self, text: &str);
}

/// Host that keeps every text it was handed
#[derive(Debug, Default)]
pub struct RecordingHost {
    received: RefCell<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All texts received so far, oldest first
    pub fn received(&self) -> Vec<String> {
        self.received.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.received.borrow().len()
    }

    pub fn last(&self) -> Option<String> {
        self.received.borrow().last().cloned()
    }
}

impl HostHooks for RecordingHost {
    fn on_change(&self, text: &str) {
        self.received.borrow_mut().push(text.to_string());
    }
}

/// Host-side buffer for the note being edited.
///
/// Every change replaces the buffered text and marks the note dirty until the
/// host takes it for saving.
#[derive(Debug, Default)]
pub struct NoteBuffer {
    text: RefCell<Option<String>>,
    dirty: Cell<bool>,
}

impl NoteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Latest text seen, saved or not
    pub fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    /// Text to save, if anything changed since the last save
    pub fn take_for_save(&self) -> Option<String> {
        if self.dirty.replace(false) {
            self.text.borrow().clone()
        } else {
            None
        }
    }

    /// Forget the buffered note, e.g. when another note is opened
    pub fn reset(&self) {
        self.text.borrow_mut().take();
        self.dirty.set(false);
    }
}

impl HostHooks for NoteBuffer {
    fn on_change(&self, text: &str) {
        *self.text.borrow_mut() = Some(text.to_string());
        self.dirty.set(true);
    }
}
