//! Editor state shared between JavaScript entry points.
//!
//! The host's change callback and the widget's onChange can call back into
//! the editor while it is still handling a change. Text pushed in that
//! window is queued and applied as soon as the editor is free. Any other
//! reentrant call fails with [`EditorError::Busy`] instead of panicking.

use commonplace_editor::{EditorError, EditorMount, HistoryEditor, Surface};
use std::cell::RefCell;
use std::collections::VecDeque;

type Mount<S> = EditorMount<HistoryEditor, S>;

pub struct EditorCell<S: Surface> {
    mount: RefCell<Mount<S>>,
    pending: RefCell<VecDeque<String>>,
}

impl<S: Surface + 'static> EditorCell<S> {
    pub fn new(mount: Mount<S>) -> Self {
        Self {
            mount: RefCell::new(mount),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Run `f` with exclusive access, then apply any text queued meanwhile
    pub fn with_mount<R>(
        &self,
        f: impl FnOnce(&mut Mount<S>) -> Result<R, EditorError>,
    ) -> Result<R, EditorError> {
        let result = {
            let mut mount = self.mount.try_borrow_mut().map_err(|_| EditorError::Busy)?;
            f(&mut mount)
        };
        self.flush_pending()?;
        result
    }

    pub fn read<R>(&self, f: impl FnOnce(&Mount<S>) -> R) -> Result<R, EditorError> {
        let mount = self.mount.try_borrow().map_err(|_| EditorError::Busy)?;
        Ok(f(&mount))
    }

    /// Replace the note with host text, deferring it while a change is running
    pub fn push_text(&self, text: &str) -> Result<(), EditorError> {
        match self.with_mount(|mount| mount.push_text(text)) {
            Err(EditorError::Busy) => {
                tracing::debug!(bytes = text.len(), "editor busy, queueing pushed text");
                self.pending.borrow_mut().push_back(text.to_string());
                Ok(())
            }
            other => other,
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn flush_pending(&self) -> Result<(), EditorError> {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(text) = next else {
                return Ok(());
            };
            self.mount
                .try_borrow_mut()
                .map_err(|_| EditorError::Busy)?
                .push_text(&text)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonplace_editor::{bridge, DocumentTree, HostHooks, Page, ShimConfig};
    use std::rc::{Rc, Weak};

    struct Screen {
        shown: Rc<RefCell<Vec<String>>>,
    }

    impl Surface for Screen {
        fn render(&mut self, doc: &DocumentTree) {
            self.shown.borrow_mut().push(bridge::serialize(doc));
        }
    }

    struct ScreenPage {
        shown: Rc<RefCell<Vec<String>>>,
    }

    impl Page for ScreenPage {
        type Surface = Screen;

        fn container(&self, _id: &str) -> Option<Screen> {
            Some(Screen {
                shown: Rc::clone(&self.shown),
            })
        }
    }

    /// Host answering every change by pushing text and reading the note back
    #[derive(Default)]
    struct EchoingHost {
        editor: RefCell<Weak<EditorCell<Screen>>>,
        reads: RefCell<Vec<Result<String, String>>>,
    }

    impl HostHooks for EchoingHost {
        fn on_change(&self, text: &str) {
            let Some(editor) = self.editor.borrow().upgrade() else {
                return;
            };
            editor.push_text(&format!("host saw {}", text)).unwrap();
            let read = editor.read(|mount| mount.text()).map_err(|e| e.to_string());
            self.reads.borrow_mut().push(read);
        }
    }

    fn mounted() -> (Rc<EditorCell<Screen>>, Rc<EchoingHost>, Rc<RefCell<Vec<String>>>) {
        let host = Rc::new(EchoingHost::default());
        let shown = Rc::new(RefCell::new(Vec::new()));
        let cell = Rc::new(EditorCell::new(EditorMount::with_history(
            ShimConfig::default(),
            host.clone(),
        )));
        *host.editor.borrow_mut() = Rc::downgrade(&cell);

        cell.with_mount(|mount| {
            mount.mount(&ScreenPage {
                shown: Rc::clone(&shown),
            })
        })
        .unwrap();
        (cell, host, shown)
    }

    #[test]
    fn test_push_from_host_callback_is_deferred() {
        let (cell, host, shown) = mounted();

        cell.with_mount(|mount| mount.local_change(bridge::deserialize("typed")))
            .unwrap();

        assert_eq!(cell.pending_len(), 0);
        assert_eq!(cell.read(|mount| mount.text()).unwrap(), "host saw typed");
        assert_eq!(*host.reads.borrow(), vec![Err(EditorError::Busy.to_string())]);
        assert_eq!(shown.borrow().last().map(String::as_str), Some("host saw typed"));
    }

    #[test]
    fn test_push_when_idle_applies_immediately() {
        let (cell, host, _) = mounted();

        cell.push_text("a\nb").unwrap();

        assert_eq!(cell.read(|mount| mount.text()).unwrap(), "a\nb");
        assert!(host.reads.borrow().is_empty());
    }

    #[test]
    fn test_reentrant_edit_is_busy() {
        let (cell, _, _) = mounted();

        let nested = cell.with_mount(|_| Ok(cell.with_mount(|mount| mount.undo())));

        assert!(matches!(nested, Ok(Err(EditorError::Busy))));
    }
}
