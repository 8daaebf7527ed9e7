//! # Editor Mount
//!
//! Binds an editing engine to a container on the page and keeps the host
//! informed.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──mount(page)──► Mounted
//! ```
//!
//! There is no way back; a mounted editor lives as long as the page.
//!
//! ## Data flow
//!
//! ```text
//! host ──push_text──► bridge ──► engine.set_document ──► render
//! user ──edit──► engine.apply ──► listener: host.on_change (Lines mode) ──► render
//! ```
//!
//! Every state change is followed by an explicit render; nothing relies on
//! an implicit reactive loop.

use crate::bridge::{deserialize, paragraph, serialize};
use crate::config::{BridgeMode, ShimConfig};
use crate::document::DocumentTree;
use crate::engine::{ChangeListener, EditorEngine, HistoryEditor};
use crate::errors::EditorError;
use crate::hooks::HostHooks;
use crate::mutations::Mutation;
use crate::undo_stack::UndoStack;
use std::cell::RefCell;
use std::rc::Rc;

/// Rendering target inside the container
pub trait Surface {
    fn render(&mut self, doc: &DocumentTree);
}

/// The page the editor is mounted on
pub trait Page {
    type Surface: Surface;

    /// Look up a container element by id
    fn container(&self, id: &str) -> Option<Self::Surface>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountState {
    Uninitialized,
    Mounted { container: String },
}

/// Editable surface bound to a host
pub struct EditorMount<E: EditorEngine, S: Surface> {
    config: ShimConfig,
    engine: E,
    host: Rc<dyn HostHooks>,
    surface: Option<Rc<RefCell<S>>>,
    state: MountState,
}

impl<S: Surface + 'static> EditorMount<HistoryEditor, S> {
    /// Mount backed by the native engine, with the configured history depth
    pub fn with_history(config: ShimConfig, host: Rc<dyn HostHooks>) -> Self {
        let engine = HistoryEditor::with_history(UndoStack::with_max_levels(config.history_depth));
        Self::new(config, engine, host)
    }
}

impl<E: EditorEngine, S: Surface + 'static> EditorMount<E, S> {
    pub fn new(config: ShimConfig, engine: E, host: Rc<dyn HostHooks>) -> Self {
        Self {
            config,
            engine,
            host,
            surface: None,
            state: MountState::Uninitialized,
        }
    }

    /// Bind to the configured container and render the initial document
    pub fn mount<P: Page<Surface = S>>(&mut self, page: &P) -> Result<(), EditorError> {
        if self.is_mounted() {
            return Err(EditorError::AlreadyMounted);
        }

        let container = self.config.container_id.clone();
        let surface = page
            .container(&container)
            .ok_or_else(|| EditorError::MissingContainer(container.clone()))?;
        let surface = Rc::new(RefCell::new(surface));

        self.engine.set_document(initial_document(self.config.mode));
        self.engine.subscribe(change_listener(
            self.config.mode,
            Rc::clone(&self.host),
            Rc::clone(&surface),
        ));
        surface.borrow_mut().render(self.engine.document());

        tracing::debug!(container = %container, mode = ?self.config.mode, "editor mounted");
        self.surface = Some(surface);
        self.state = MountState::Mounted { container };
        Ok(())
    }

    /// Replace the document with text coming from the host.
    ///
    /// Local edits are discarded and the host is not notified.
    pub fn push_text(&mut self, text: &str) -> Result<(), EditorError> {
        let surface = self.mounted_surface()?;

        let doc = match self.config.mode {
            BridgeMode::Paragraph => paragraph(text),
            BridgeMode::Lines => deserialize(text),
        };
        tracing::debug!(bytes = text.len(), blocks = doc.block_count(), "text pushed by host");

        self.engine.set_document(doc);
        surface.borrow_mut().render(self.engine.document());
        Ok(())
    }

    /// Apply a local edit
    pub fn edit(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        self.mounted_surface()?;
        self.engine.apply(mutation)?;
        Ok(())
    }

    /// Take a whole new document produced by the editing widget
    pub fn local_change(&mut self, doc: DocumentTree) -> Result<(), EditorError> {
        self.edit(Mutation::ReplaceDocument { document: doc })
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.mounted_surface()?;
        Ok(self.engine.undo()?)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.mounted_surface()?;
        Ok(self.engine.redo()?)
    }

    pub fn document(&self) -> &DocumentTree {
        self.engine.document()
    }

    /// Current document as host text
    pub fn text(&self) -> String {
        serialize(self.engine.document())
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &ShimConfig {
        &self.config
    }

    pub fn state(&self) -> &MountState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, MountState::Mounted { .. })
    }

    fn mounted_surface(&self) -> Result<Rc<RefCell<S>>, EditorError> {
        self.surface.as_ref().map(Rc::clone).ok_or(EditorError::NotMounted)
    }
}

/// Document shown right after mounting
pub fn initial_document(mode: BridgeMode) -> DocumentTree {
    match mode {
        BridgeMode::Paragraph => DocumentTree::empty(),
        BridgeMode::Lines => deserialize(""),
    }
}

/// Listener run by the engine after each local change: report, then render
fn change_listener<S: Surface + 'static>(
    mode: BridgeMode,
    host: Rc<dyn HostHooks>,
    surface: Rc<RefCell<S>>,
) -> ChangeListener {
    Box::new(move |doc: &DocumentTree| {
        if mode.reports_changes() {
            let text = serialize(doc);
            tracing::debug!(bytes = text.len(), "reporting local change to host");
            host.on_change(&text);
        }
        surface.borrow_mut().render(doc);
    })
}
