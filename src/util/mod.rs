use crate::error::{PageError, Result};
use leptos::prelude::set_timeout;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, NodeList};

pub(crate) fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub(crate) fn document() -> Result<Document> {
    web_sys::window()
        .ok_or(PageError::MissingWindow)?
        .document()
        .ok_or(PageError::MissingDocument)
}

pub(crate) fn query_all<T: JsCast>(doc: &Document, selector: &str) -> Result<Vec<T>> {
    Ok(collect_nodes(doc.query_selector_all(selector)?))
}

pub(crate) fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>> {
    Ok(collect_nodes(root.query_selector_all(selector)?))
}

/// Nodes that don't cast to `T` are skipped.
fn collect_nodes<T: JsCast>(list: NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<T>().ok())
        .collect()
}

/// Attaches a listener for the lifetime of the page.
pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<()> {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    // Listeners are never removed; the page owns them until navigation.
    cb.forget();
    Ok(())
}

/// Runs `f` after `ms` milliseconds. No cancellation handle.
pub(crate) fn after_ms(ms: u32, f: impl FnOnce() + 'static) {
    set_timeout(f, Duration::from_millis(u64::from(ms)));
}

pub(crate) fn data_attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{name}"))
        .filter(|v| !v.trim().is_empty())
}

pub(crate) fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}
