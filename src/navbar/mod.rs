use crate::error::{PageError, Result};
use crate::state::PageContext;
use crate::util::{document, listen, set_style};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavbarPosition {
    Shown,
    Hidden,
}

impl NavbarPosition {
    fn transform(self) -> &'static str {
        match self {
            NavbarPosition::Shown => "translateY(0)",
            NavbarPosition::Hidden => "translateY(-100%)",
        }
    }
}

/// Derives header visibility from successive scroll offsets.
#[derive(Clone, Debug)]
pub struct NavbarTracker {
    threshold: f64,
    last_y: f64,
}

impl NavbarTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_y: 0.0,
        }
    }

    pub fn update(&mut self, y: f64) -> NavbarPosition {
        let position = if y > self.threshold && y > self.last_y {
            NavbarPosition::Hidden
        } else {
            NavbarPosition::Shown
        };
        self.last_y = y;
        position
    }
}

fn find_header() -> Result<Option<HtmlElement>> {
    let doc = document()?;
    let el = match doc.query_selector("header")? {
        Some(el) => Some(el),
        None => doc.query_selector(".navbar")?,
    };
    Ok(el.and_then(|e| e.dyn_into::<HtmlElement>().ok()))
}

pub fn init(ctx: &PageContext) -> Result<()> {
    let Some(header) = find_header()? else {
        return Ok(());
    };
    set_style(&header, "transition", "transform 0.3s ease");

    let tracker = Rc::new(RefCell::new(NavbarTracker::new(ctx.config.navbar_threshold_px)));
    let window = web_sys::window().ok_or(PageError::MissingWindow)?;
    let win = window.clone();
    listen(&window, "scroll", move |_| {
        let Ok(y) = win.scroll_y() else {
            return;
        };
        let position = tracker.borrow_mut().update(y);
        set_style(&header, "transform", position.transform());
    })
}
