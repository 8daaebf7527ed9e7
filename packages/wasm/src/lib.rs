use commonplace_editor::{EditorError, EditorMount, HostHooks, ShimConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

mod cell;
mod globals;
mod widget;

pub use cell::EditorCell;
pub use globals::{register_inbound, FunctionHook, GlobalHook};
pub use widget::{decode_widget_value, DomPage, ShownValue, WidgetSurface};

type SharedEditor = Rc<EditorCell<WidgetSurface>>;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
}

/// Parse an optional JSON config, defaulting every missing field
pub fn parse_config(config_json: Option<&str>) -> Result<ShimConfig, EditorError> {
    match config_json {
        Some(json) if !json.trim().is_empty() => ShimConfig::from_json(json),
        _ => Ok(ShimConfig::default()),
    }
}

fn js_error(e: EditorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Note editor bound to the page's widget
#[wasm_bindgen]
pub struct BrowserEditor {
    editor: SharedEditor,
}

impl BrowserEditor {
    fn with_host(config: ShimConfig, host: Rc<dyn HostHooks>) -> Self {
        Self {
            editor: Rc::new(EditorCell::new(EditorMount::with_history(config, host))),
        }
    }
}

#[wasm_bindgen]
impl BrowserEditor {
    /// Create an editor reporting changes to `on_change(text)`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, on_change: js_sys::Function) -> Result<BrowserEditor, JsValue> {
        let config = parse_config(config_json.as_deref()).map_err(js_error)?;
        Ok(Self::with_host(config, Rc::new(FunctionHook::new(on_change))))
    }

    /// Mount the widget into the configured container
    pub fn mount(&self) -> Result<(), JsValue> {
        let shown: ShownValue = Rc::new(RefCell::new(None));
        let page = DomPage::new(
            widget_change_handler(Rc::downgrade(&self.editor), Rc::clone(&shown)),
            shown,
        );
        self.editor.with_mount(|mount| mount.mount(&page)).map_err(js_error)
    }

    /// Replace the note with text from the host.
    ///
    /// Called from inside the change callback, the text is applied once the
    /// current change has finished.
    #[wasm_bindgen(js_name = pushText)]
    pub fn push_text(&self, text: &str) -> Result<(), JsValue> {
        self.editor.push_text(text).map_err(js_error)
    }

    /// Feed a new widget value, as the widget's change handler does
    #[wasm_bindgen(js_name = localChange)]
    pub fn local_change(&self, value_json: &str) -> Result<(), JsValue> {
        let doc = decode_widget_value(value_json).map_err(js_error)?;
        self.editor.with_mount(|mount| mount.local_change(doc)).map_err(js_error)
    }

    /// Current note text
    pub fn text(&self) -> Result<String, JsValue> {
        self.editor.read(|mount| mount.text()).map_err(js_error)
    }

    pub fn undo(&self) -> Result<bool, JsValue> {
        self.editor.with_mount(|mount| mount.undo()).map_err(js_error)
    }

    pub fn redo(&self) -> Result<bool, JsValue> {
        self.editor.with_mount(|mount| mount.redo()).map_err(js_error)
    }

    /// Expose `pushText` as `window.<inboundHook>`
    #[wasm_bindgen(js_name = registerGlobals)]
    pub fn register_globals(&self) -> Result<(), JsValue> {
        let name = self
            .editor
            .read(|mount| mount.config().inbound_hook.clone())
            .map_err(js_error)?;
        let editor = Rc::downgrade(&self.editor);

        register_inbound(&name, move |text: String| {
            let Some(editor) = editor.upgrade() else {
                return;
            };
            if let Err(e) = editor.push_text(&text) {
                tracing::error!("Failed to push text: {}", e);
            }
        })
    }
}

/// Mount an editor wired through page globals: the host calls
/// `window.<inboundHook>(text)` and defines `window.<outboundHook>(text)`.
#[wasm_bindgen(js_name = startEditor)]
pub fn start_editor(config_json: Option<String>) -> Result<BrowserEditor, JsValue> {
    let config = parse_config(config_json.as_deref()).map_err(js_error)?;
    let host = Rc::new(GlobalHook::new(config.outbound_hook.clone()));

    let editor = BrowserEditor::with_host(config, host);
    editor.mount()?;
    editor.register_globals()?;
    Ok(editor)
}

/// Closure handed to the widget as its onChange callback
fn widget_change_handler(editor: Weak<EditorCell<WidgetSurface>>, shown: ShownValue) -> Closure<dyn FnMut(String)> {
    Closure::new(move |value_json: String| {
        let Some(editor) = editor.upgrade() else {
            return;
        };

        let result = widget::decode_reported(&value_json).and_then(|(doc, intact)| {
            if intact {
                widget::remember_shown(&shown, &doc);
            }
            editor.with_mount(|mount| mount.local_change(doc))
        });
        match result {
            Ok(()) => {}
            // A change fired while we are rendering is our own value coming back
            Err(EditorError::Busy) => {}
            Err(e) => tracing::error!("Failed to apply widget change: {}", e),
        }
    })
}
