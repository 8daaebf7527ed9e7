//! Browser tests, run with `wasm-pack test --headless --firefox packages/wasm`
#![cfg(target_arch = "wasm32")]

use commonplace_wasm::{start_editor, BrowserEditor};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Fake widget recording the last value it was given
fn install_page(container_id: &str) {
    js_sys::eval(
        "window.richTextWidget = {
            mount(container, onChange) { window.__widgetChange = onChange; },
            setValue(value) { window.__widgetValue = value; window.__setCount += 1; },
        };
        window.__setCount = 0;
        window.__changes = [];
        window.update_content = (text) => window.__changes.push(text);",
    )
    .unwrap();

    let document = web_sys::window().unwrap().document().unwrap();
    if document.get_element_by_id(container_id).is_none() {
        let element = document.create_element("div").unwrap();
        element.set_id(container_id);
        document.body().unwrap().append_child(&element).unwrap();
    }
}

fn set_count() -> f64 {
    js_sys::eval("window.__setCount").unwrap().as_f64().unwrap()
}

fn changes() -> Vec<String> {
    let value = js_sys::eval("JSON.stringify(window.__changes)").unwrap();
    serde_json::from_str(&value.as_string().unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn mount_and_push_reach_the_widget() {
    install_page("editor");
    let on_change = js_sys::Function::new_with_args("text", "window.__changes.push(text)");

    let editor = BrowserEditor::new(None, on_change).unwrap();
    editor.mount().unwrap();
    editor.push_text("hello\nworld").unwrap();

    let value = js_sys::eval("window.__widgetValue").unwrap();
    assert_eq!(
        value.as_string().unwrap(),
        r#"[{"children":[{"text":"hello"}]},{"children":[{"text":"world"}]}]"#
    );
    assert!(changes().is_empty());
}

#[wasm_bindgen_test]
fn widget_change_is_reported_once() {
    install_page("editor");
    let on_change = js_sys::Function::new_with_args("text", "window.__changes.push(text)");

    let editor = BrowserEditor::new(None, on_change).unwrap();
    editor.mount().unwrap();
    js_sys::eval(r#"window.__widgetChange('[{"children":[{"text":"typed"}]}]')"#).unwrap();

    assert_eq!(changes(), vec!["typed"]);
    assert_eq!(editor.text().unwrap(), "typed");
}

#[wasm_bindgen_test]
fn missing_container_is_an_error() {
    install_page("editor");
    let on_change = js_sys::Function::new_no_args("");

    let editor = BrowserEditor::new(Some(r#"{"containerId": "absent"}"#.to_string()), on_change).unwrap();
    let err: JsValue = editor.mount().unwrap_err();
    assert!(err.as_string().unwrap().contains("absent"));
}

#[wasm_bindgen_test]
fn globals_route_text_both_ways() {
    install_page("globals-editor");

    let editor = start_editor(Some(r#"{"containerId": "globals-editor"}"#.to_string())).unwrap();
    js_sys::eval("window.update_slate('from host')").unwrap();
    assert_eq!(editor.text().unwrap(), "from host");

    editor.local_change(r#"[{"children":[{"text":"edited"}]}]"#).unwrap();
    assert_eq!(changes(), vec!["edited"]);
}

#[wasm_bindgen_test]
fn widget_edit_is_not_written_back() {
    install_page("editor");
    let on_change = js_sys::Function::new_no_args("");

    let editor = BrowserEditor::new(None, on_change).unwrap();
    editor.mount().unwrap();
    let after_mount = set_count();

    js_sys::eval(r#"window.__widgetChange('[{"type":"paragraph","children":[{"text":"typed"}]}]')"#).unwrap();

    assert_eq!(set_count(), after_mount);
    assert_eq!(editor.text().unwrap(), "typed");
}

#[wasm_bindgen_test]
fn host_can_push_from_its_change_callback() {
    install_page("editor");
    let on_change = js_sys::Function::new_with_args(
        "text",
        "window.__changes.push(text); window.update_slate('saved: ' + text);",
    );

    let editor = BrowserEditor::new(None, on_change).unwrap();
    editor.mount().unwrap();
    editor.register_globals().unwrap();

    editor.local_change(r#"[{"children":[{"text":"typed"}]}]"#).unwrap();

    assert_eq!(changes(), vec!["typed"]);
    assert_eq!(editor.text().unwrap(), "saved: typed");
}
