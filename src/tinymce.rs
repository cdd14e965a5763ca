//! Bindings to the TinyMCE runtime loaded by `index.html`.

use js_sys::{Object, Reflect};
use thiserror::Error;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::{EditorConfig, SIGNATURE_BUTTON_NAME, SIGNATURE_ICON_NAME, SIGNATURE_ICON_SVG};
use crate::splice::DocumentHandle;

/// Popups and menus TinyMCE mounts outside the editor frame.
const AUX_SELECTOR: &str = ".tox-tinymce-aux";
const AUX_Z_INDEX: &str = "999999";

#[wasm_bindgen]
extern "C" {
    /// The global `tinymce` object.
    pub type TinyMce;

    #[wasm_bindgen(method)]
    fn init(this: &TinyMce, config: &JsValue) -> js_sys::Promise;

    /// One live editor instance.
    #[derive(Clone, Debug)]
    pub type Editor;

    #[wasm_bindgen(method, js_name = getContent)]
    pub fn get_content(this: &Editor) -> String;

    #[wasm_bindgen(method, js_name = setContent)]
    fn set_content_raw(this: &Editor, html: &str);

    #[wasm_bindgen(method, js_name = getBody)]
    pub fn get_body(this: &Editor) -> web_sys::HtmlElement;

    #[wasm_bindgen(method, getter)]
    pub fn selection(this: &Editor) -> EditorSelection;

    #[wasm_bindgen(method, getter)]
    fn ui(this: &Editor) -> EditorUi;

    #[wasm_bindgen(method, getter)]
    fn mode(this: &Editor) -> EditorMode;

    #[wasm_bindgen(method)]
    fn on(this: &Editor, events: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Editor);

    pub type EditorSelection;

    #[wasm_bindgen(method)]
    pub fn select(this: &EditorSelection, node: &web_sys::Node, content: bool);

    #[wasm_bindgen(method)]
    pub fn collapse(this: &EditorSelection, to_start: bool);

    type EditorUi;

    #[wasm_bindgen(method, getter)]
    fn registry(this: &EditorUi) -> UiRegistry;

    type UiRegistry;

    #[wasm_bindgen(method, js_name = addButton)]
    fn add_button(this: &UiRegistry, name: &str, options: &JsValue);

    #[wasm_bindgen(method, js_name = addIcon)]
    fn add_icon(this: &UiRegistry, name: &str, svg: &str);

    type EditorMode;

    #[wasm_bindgen(method)]
    fn set(this: &EditorMode, mode: &str);
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("TinyMCE runtime is not loaded")]
    RuntimeMissing,
    #[error("could not build editor config: {0}")]
    Config(String),
    #[error("could not set editor option '{0}'")]
    Option(&'static str),
}

/// `window.tinymce`, if the script has loaded.
pub fn runtime() -> Option<TinyMce> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str("tinymce")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(value.unchecked_into())
}

pub fn runtime_loaded() -> bool {
    runtime().is_some()
}

impl Editor {
    pub fn set_readonly(&self, readonly: bool) {
        self.mode().set(if readonly { "readonly" } else { "design" });
    }

    /// Subscribe to editor events; the handler lives as long as the page.
    pub fn listen<F>(&self, events: &str, handler: F)
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::<dyn FnMut()>::new(handler);
        self.on(events, closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

impl DocumentHandle for Editor {
    fn set_content(&self, html: &str) {
        self.set_content_raw(html);
    }

    fn move_cursor_to_end(&self) {
        let selection = self.selection();
        selection.select(&self.get_body(), true);
        selection.collapse(false);
    }
}

/// Owning handle to a mounted editor; dropping it tears the editor down.
#[derive(Debug)]
pub struct EditorInstance(Editor);

impl EditorInstance {
    pub fn new(editor: Editor) -> Self {
        Self(editor)
    }
}

impl std::ops::Deref for EditorInstance {
    type Target = Editor;

    fn deref(&self) -> &Editor {
        &self.0
    }
}

impl Drop for EditorInstance {
    fn drop(&mut self) {
        debug!("removing editor instance");
        self.0.remove();
    }
}

/// Callbacks wired into `tinymce.init`.
pub struct EditorHooks {
    /// Tooltip of the signature button, which TinyMCE also uses as its
    /// accessible label.
    pub button_label: String,
    /// Action for the signature toolbar button. `None` skips registering it.
    pub on_signature_button: Option<Box<dyn FnMut()>>,
    pub on_ready: Box<dyn FnOnce(Editor)>,
}

fn set_option(target: &Object, key: &'static str, value: &JsValue) -> Result<(), EditorError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map_err(|_| EditorError::Option(key))?
        .then_some(())
        .ok_or(EditorError::Option(key))
}

fn register_signature_button(
    editor: &Editor,
    label: &str,
    action: Box<dyn FnMut()>,
) -> Result<(), EditorError> {
    let registry = editor.ui().registry();
    let options = Object::new();
    set_option(&options, "icon", &JsValue::from_str(SIGNATURE_ICON_NAME))?;
    set_option(&options, "tooltip", &JsValue::from_str(label))?;
    let on_action = Closure::<dyn FnMut()>::new(action);
    set_option(&options, "onAction", on_action.as_ref())?;
    on_action.forget();

    registry.add_button(SIGNATURE_BUTTON_NAME, &options);
    registry.add_icon(SIGNATURE_ICON_NAME, SIGNATURE_ICON_SVG);
    debug!("signature toolbar button registered");
    Ok(())
}

/// Raise TinyMCE's floating menus above the host page.
pub fn raise_aux_layers() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(nodes) = document.query_selector_all(AUX_SELECTOR) else {
        return;
    };
    for i in 0..nodes.length() {
        if let Some(element) = nodes
            .item(i)
            .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = element.style().set_property("z-index", AUX_Z_INDEX);
        }
    }
}

/// Turn `target` into a TinyMCE editor.
pub fn mount(
    target: &web_sys::HtmlTextAreaElement,
    config: &EditorConfig,
    hooks: EditorHooks,
) -> Result<(), EditorError> {
    let tinymce = runtime().ok_or(EditorError::RuntimeMissing)?;

    let options: Object = serde_wasm_bindgen::to_value(config)
        .map_err(|e| EditorError::Config(e.to_string()))?
        .unchecked_into();
    set_option(&options, "target", target.as_ref())?;

    let EditorHooks {
        button_label,
        on_signature_button,
        on_ready,
    } = hooks;

    let mut signature_action = on_signature_button;
    let setup = Closure::<dyn FnMut(Editor)>::new(move |editor: Editor| {
        if let Some(action) = signature_action.take() {
            if let Err(err) = register_signature_button(&editor, &button_label, action) {
                warn!(%err, "signature button unavailable");
            }
        }
    });
    set_option(&options, "setup", setup.as_ref())?;
    setup.forget();

    let ready = Closure::once_into_js(move |editor: Editor| {
        editor.listen("focus", raise_aux_layers);
        on_ready(editor);
    });
    set_option(&options, "init_instance_callback", &ready)?;

    // The promise only mirrors init_instance_callback; nothing to await.
    let _ = tinymce.init(&options);
    Ok(())
}
