use crate::error::Result;
use crate::state::PageContext;
use crate::util::{document, listen, now_ms, query_all, set_style};
use leptos::prelude::request_animation_frame;
use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

const REVEAL_THRESHOLD: f64 = 0.1;
const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// jQuery's default `swing` curve.
pub fn swing(progress: f64) -> f64 {
    0.5 - (progress * PI).cos() / 2.0
}

pub fn scroll_position_at(start: f64, end: f64, elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return end;
    }
    let p = (elapsed_ms / duration_ms).clamp(0.0, 1.0);
    start + (end - start) * swing(p)
}

/// Document offset to scroll to so the target sits just under the fixed header.
pub fn scroll_target(top_in_viewport: f64, scroll_y: f64, header_offset: f64) -> f64 {
    (top_in_viewport + scroll_y - header_offset).max(0.0)
}

/// `#section` -> `section`. A bare `#` is not a target.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Shared by every anchor so a new scroll stops the one in flight.
#[derive(Clone, Debug, Default)]
pub struct ScrollAnimation {
    generation: Rc<Cell<u32>>,
}

impl ScrollAnimation {
    /// Starts a new animation; any earlier id goes stale.
    pub fn begin(&self) -> u32 {
        let id = self.generation.get().wrapping_add(1);
        self.generation.set(id);
        id
    }

    pub fn is_current(&self, id: u32) -> bool {
        self.generation.get() == id
    }
}

struct ScrollRun {
    window: Window,
    animation: ScrollAnimation,
    id: u32,
    start: f64,
    end: f64,
    started_ms: f64,
    duration_ms: f64,
}

fn animate_scroll_to(window: &Window, animation: &ScrollAnimation, end: f64, duration_ms: f64) {
    let run = ScrollRun {
        window: window.clone(),
        animation: animation.clone(),
        id: animation.begin(),
        start: window.scroll_y().unwrap_or(0.0),
        end,
        started_ms: now_ms(),
        duration_ms,
    };
    scroll_step(run);
}

fn scroll_step(run: ScrollRun) {
    request_animation_frame(move || {
        if !run.animation.is_current(run.id) {
            return;
        }
        let elapsed = now_ms() - run.started_ms;
        let y = scroll_position_at(run.start, run.end, elapsed, run.duration_ms);
        run.window.scroll_to_with_x_and_y(0.0, y);
        if elapsed < run.duration_ms {
            scroll_step(run);
        }
    });
}

pub fn init_smooth_scroll(ctx: &PageContext) -> Result<()> {
    let doc = document()?;
    let offset = ctx.config.header_offset_px;
    let duration = ctx.config.scroll_duration_ms;
    let animation = ScrollAnimation::default();

    for anchor in query_all::<Element>(&doc, "a[href^=\"#\"]")? {
        // Tabs, collapses and dropdowns own their own `#` links.
        if anchor.has_attribute("data-bs-toggle") {
            continue;
        }
        let doc = doc.clone();
        let el = anchor.clone();
        let animation = animation.clone();
        listen(&anchor, "click", move |ev| {
            let Some(href) = el.get_attribute("href") else {
                return;
            };
            let Some(target) = fragment_id(&href).and_then(|id| doc.get_element_by_id(id)) else {
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            ev.prevent_default();

            let top = target.get_bounding_client_rect().top();
            let end = scroll_target(top, window.scroll_y().unwrap_or(0.0), offset);
            animate_scroll_to(&window, &animation, end, duration);
        })?;
    }
    Ok(())
}

pub fn observer_available() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &"IntersectionObserver".into()).ok())
        .is_some_and(|v| v.is_function())
}

fn hide_for_reveal(el: &HtmlElement) {
    set_style(el, "opacity", "0");
    set_style(el, "transform", "translateY(20px)");
    set_style(el, "transition", REVEAL_TRANSITION);
}

fn reveal(el: &HtmlElement) {
    set_style(el, "opacity", "1");
    set_style(el, "transform", "translateY(0)");
}

/// Fades content blocks in the first time they scroll into view.
pub fn init_reveal(ctx: &PageContext) -> Result<()> {
    if !observer_available() {
        return Ok(());
    }
    let doc = document()?;
    let targets = query_all::<HtmlElement>(&doc, &ctx.config.reveal_selector)?;
    if targets.is_empty() {
        return Ok(());
    }

    let cb = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(el) = target.dyn_ref::<HtmlElement>() {
                    reveal(el);
                }
                // One-shot: never hidden again.
                observer.unobserve(&target);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from(REVEAL_THRESHOLD));
    options.set_root_margin(REVEAL_ROOT_MARGIN);
    let observer = IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &options)?;
    cb.forget();

    for el in &targets {
        hide_for_reveal(el);
        observer.observe(el);
    }
    log::debug!("watching {} blocks for reveal", targets.len());
    Ok(())
}
