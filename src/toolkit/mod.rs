//! Bindings to the Bootstrap 5 global the server templates load.
//!
//! Every constructor is `catch`: if `window.bootstrap` disappears between
//! detection and use we get an `Err`, not a trap.

use crate::error::{PageError, Result};
use crate::util::query_all;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    pub type Modal;

    #[wasm_bindgen(constructor, catch, js_namespace = bootstrap)]
    fn new(element: &Element) -> std::result::Result<Modal, JsValue>;

    #[wasm_bindgen(method)]
    pub fn show(this: &Modal);

    #[wasm_bindgen(method)]
    pub fn hide(this: &Modal);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    pub type Toast;

    #[wasm_bindgen(constructor, catch, js_namespace = bootstrap)]
    fn new(element: &Element, options: &JsValue) -> std::result::Result<Toast, JsValue>;

    #[wasm_bindgen(method)]
    pub fn show(this: &Toast);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap)]
    pub type Tooltip;

    #[wasm_bindgen(constructor, catch, js_namespace = bootstrap)]
    fn new(element: &Element) -> std::result::Result<Tooltip, JsValue>;
}

const TOOLKIT_GLOBAL: &str = "bootstrap";

/// Whether the presentation toolkit was present at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toolkit {
    available: bool,
}

impl Toolkit {
    pub fn detect() -> Self {
        let available = web_sys::window()
            .and_then(|w| js_sys::Reflect::get(&w, &TOOLKIT_GLOBAL.into()).ok())
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false);
        Self { available }
    }

    pub fn unavailable() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn modal(&self, element: &Element) -> Result<Modal> {
        if !self.available {
            return Err(PageError::ToolkitUnavailable);
        }
        Ok(Modal::new(element)?)
    }

    /// Shows `element` as a toast that hides itself after `delay_ms`.
    pub fn show_toast(&self, element: &Element, delay_ms: u32) -> Result<()> {
        if !self.available {
            return Err(PageError::ToolkitUnavailable);
        }
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"delay".into(), &JsValue::from(delay_ms))?;
        Toast::new(element, &options)?.show();
        Ok(())
    }

    /// Returns how many tooltips were created.
    pub fn init_tooltips(&self, doc: &Document) -> Result<usize> {
        if !self.available {
            return Ok(0);
        }
        let targets = query_all::<Element>(doc, "[data-bs-toggle=\"tooltip\"]")?;
        let mut created = 0;
        for el in &targets {
            match Tooltip::new(el) {
                Ok(_) => created += 1,
                Err(e) => log::debug!("tooltip init failed: {}", PageError::from(e)),
            }
        }
        Ok(created)
    }
}
