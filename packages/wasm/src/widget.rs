//! Binding to the rich-text widget living on the page.
//!
//! The page provides a global `richTextWidget` object wrapping the editor
//! framework:
//!
//! ```js
//! window.richTextWidget = {
//!     mount(container, onChange) { /* onChange(valueJson) on every edit */ },
//!     setValue(valueJson) { /* replace the displayed document */ },
//! };
//! ```

use commonplace_editor::{DocumentTree, EditorError, Page, Surface};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = richTextWidget, js_name = mount)]
    fn widget_mount(container: &web_sys::HtmlElement, on_change: &Closure<dyn FnMut(String)>);

    #[wasm_bindgen(js_namespace = richTextWidget, js_name = setValue)]
    fn widget_set_value(value: &str);
}

/// Value the widget is known to display, as encoded by [`DocumentTree::to_json`]
pub type ShownValue = Rc<RefCell<Option<String>>>;

/// Decode the widget's value, filling in leaves the framework requires
pub fn decode_widget_value(json: &str) -> Result<DocumentTree, EditorError> {
    decode_reported(json).map(|(doc, _)| doc)
}

/// Decode a value reported by the widget.
///
/// The flag is true when the value needed no repair, which means the widget
/// already displays exactly the decoded document.
pub(crate) fn decode_reported(json: &str) -> Result<(DocumentTree, bool), EditorError> {
    let mut doc = DocumentTree::from_json(json)?;
    let fixed = doc.normalize();
    if fixed > 0 {
        tracing::debug!(fixed, "widget value had blocks without leaves");
    }
    Ok((doc, fixed == 0))
}

/// Note that the widget already displays `doc`, so rendering it is a no-op
pub(crate) fn remember_shown(shown: &ShownValue, doc: &DocumentTree) {
    match doc.to_json() {
        Ok(json) => *shown.borrow_mut() = Some(json),
        Err(e) => tracing::warn!("Failed to encode widget value: {}", e),
    }
}

/// The widget mounted in its container
pub struct WidgetSurface {
    // Dropping the closure would invalidate the widget's onChange callback
    _on_change: Closure<dyn FnMut(String)>,
    shown: ShownValue,
}

impl Surface for WidgetSurface {
    fn render(&mut self, doc: &DocumentTree) {
        let json = match doc.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode document for widget: {}", e);
                return;
            }
        };
        if self.shown.borrow().as_deref() == Some(json.as_str()) {
            return;
        }
        // setValue may fire onChange synchronously, so no borrow is held across it
        *self.shown.borrow_mut() = Some(json.clone());
        widget_set_value(&json);
    }
}

/// The browser document, handing out the widget for a container id
pub struct DomPage {
    on_change: RefCell<Option<Closure<dyn FnMut(String)>>>,
    shown: ShownValue,
}

impl DomPage {
    pub fn new(on_change: Closure<dyn FnMut(String)>, shown: ShownValue) -> Self {
        Self {
            on_change: RefCell::new(Some(on_change)),
            shown,
        }
    }
}

impl Page for DomPage {
    type Surface = WidgetSurface;

    fn container(&self, id: &str) -> Option<WidgetSurface> {
        let element = web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<web_sys::HtmlElement>()
            .ok()?;
        let on_change = self.on_change.borrow_mut().take()?;

        widget_mount(&element, &on_change);

        Some(WidgetSurface {
            _on_change: on_change,
            shown: Rc::clone(&self.shown),
        })
    }
}
