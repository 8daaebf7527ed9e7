//! # Commonplace Editor
//!
//! Connects the note editor on the page to the host application core.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: application core                      │
//! └─────────────────────────────────────────────┘
//!        push_text ↓            ↑ on_change
//! ┌─────────────────────────────────────────────┐
//! │ bridge: text ⇄ document tree                │
//! └─────────────────────────────────────────────┘
//!                     ↓ ↑
//! ┌─────────────────────────────────────────────┐
//! │ mount: lifecycle, render after each change  │
//! │ engine: document state, edits, history      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use commonplace_editor::{
//!     DocumentTree, EditorMount, HistoryEditor, Mutation, Page, RecordingHost, ShimConfig,
//!     Surface,
//! };
//! use std::rc::Rc;
//!
//! struct Nowhere;
//! impl Surface for Nowhere {
//!     fn render(&mut self, _doc: &DocumentTree) {}
//! }
//!
//! struct Blank;
//! impl Page for Blank {
//!     type Surface = Nowhere;
//!     fn container(&self, _id: &str) -> Option<Nowhere> {
//!         Some(Nowhere)
//!     }
//! }
//!
//! let host = Rc::new(RecordingHost::new());
//! let mut editor: EditorMount<HistoryEditor, Nowhere> =
//!     EditorMount::with_history(ShimConfig::default(), host.clone());
//! editor.mount(&Blank)?;
//!
//! editor.push_text("hello\nworld")?;
//! editor.edit(Mutation::InsertText { block: 1, leaf: 0, offset: 5, text: "!".into() })?;
//!
//! assert_eq!(host.received(), vec!["hello\nworld!"]);
//! # Ok::<(), commonplace_editor::EditorError>(())
//! ```

pub mod bridge;
mod config;
mod document;
mod engine;
mod errors;
mod hooks;
mod mount;
mod mutations;
mod undo_stack;

pub use config::{BridgeMode, ShimConfig, DEFAULT_CONFIG_NAME};
pub use document::{Block, DocumentTree, Leaf};
pub use engine::{ChangeListener, EditorEngine, HistoryEditor, SubscriptionId, Subscribers};
pub use errors::EditorError;
pub use hooks::{HostHooks, NoteBuffer, RecordingHost};
pub use mount::{initial_document, EditorMount, MountState, Page, Surface};
pub use mutations::{Mutation, MutationError};
pub use undo_stack::{MutationBatch, UndoStack, DEFAULT_MAX_LEVELS};
