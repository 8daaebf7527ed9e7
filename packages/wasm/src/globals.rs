//! Host hooks reached through JavaScript functions.
//!
//! Two ways to wire the host in:
//! - pass the outbound callback directly ([`FunctionHook`])
//! - the page-global convention, where the host defines `window.<outbound>`
//!   and calls `window.<inbound>(text)` ([`GlobalHook`], [`register_inbound`])

use commonplace_editor::HostHooks;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Outbound hook given to us as a function
pub struct FunctionHook {
    callback: js_sys::Function,
}

impl FunctionHook {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl HostHooks for FunctionHook {
    fn on_change(&self, text: &str) {
        if let Err(e) = self.callback.call1(&JsValue::NULL, &JsValue::from_str(text)) {
            tracing::warn!("Host change callback threw: {:?}", e);
        }
    }
}

/// Outbound hook looked up on `window` at every call
pub struct GlobalHook {
    name: String,
}

impl GlobalHook {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl HostHooks for GlobalHook {
    fn on_change(&self, text: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let hook = js_sys::Reflect::get(&window, &JsValue::from_str(&self.name))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());

        match hook {
            Some(function) => {
                if let Err(e) = function.call1(&JsValue::NULL, &JsValue::from_str(text)) {
                    tracing::warn!("window.{} threw: {:?}", self.name, e);
                }
            }
            None => tracing::warn!("window.{} is not a function, change dropped", self.name),
        }
    }
}

/// Install `window.<name>` as a permanent function calling `on_text`
pub fn register_inbound(name: &str, on_text: impl FnMut(String) + 'static) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

    let closure = Closure::<dyn FnMut(String)>::new(on_text);
    js_sys::Reflect::set(&window, &JsValue::from_str(name), closure.as_ref())?;
    // The page keeps calling the hook for its whole lifetime
    closure.forget();

    tracing::debug!("registered window.{}", name);
    Ok(())
}
