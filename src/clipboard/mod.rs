use crate::error::{PageError, Result};
use crate::state::PageContext;
use crate::toast::{show_toast, Severity};
use crate::util::{data_attr, document, listen, query_all};
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Clipboard, Element};

pub const COPY_SELECTOR: &str = "[data-copy]";
pub const COPIED_MESSAGE: &str = "Copiado para a área de transferência!";

/// `navigator.clipboard` only exists in secure contexts.
fn clipboard() -> Option<Clipboard> {
    let navigator = web_sys::window()?.navigator();
    let value = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(value.unchecked_into::<Clipboard>())
}

pub fn is_available() -> bool {
    clipboard().is_some()
}

pub async fn write_text(text: &str) -> Result<()> {
    let clipboard = clipboard().ok_or_else(|| PageError::Js("clipboard API unavailable".into()))?;
    JsFuture::from(clipboard.write_text(text)).await?;
    Ok(())
}

pub fn init(ctx: &PageContext) -> Result<()> {
    let doc = document()?;
    for trigger in query_all::<Element>(&doc, COPY_SELECTOR)? {
        let ctx = ctx.clone();
        let el = trigger.clone();
        listen(&trigger, "click", move |ev| {
            ev.prevent_default();
            let Some(text) = data_attr(&el, "copy") else {
                return;
            };
            let ctx = ctx.clone();
            spawn_local(async move {
                match write_text(&text).await {
                    Ok(()) => {
                        if let Err(e) = show_toast(&ctx, COPIED_MESSAGE, Severity::Success) {
                            log::debug!("copy toast failed: {e}");
                        }
                    }
                    // Denied or unsupported; nothing to tell the user.
                    Err(e) => log::debug!("copy failed: {e}"),
                }
            });
        })?;
    }
    Ok(())
}
