use crate::error::Result;
use crate::util::{document, listen, query_all};
use std::cell::RefCell;
use std::rc::Rc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

/// URL-safe, lower-case, hyphen-delimited form of `text`.
///
/// Only ASCII letters, digits, `_` and `-` survive; accents are folded to
/// their base letter first so `"Café"` becomes `"cafe"`.
pub fn generate_slug(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(folded.len());
    for c in folded.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

/// Decides whether the slug field may still follow the name field.
///
/// The field follows while it is empty or still holds the last value we wrote
/// into it; anything else came from the server or the user and is left alone.
/// Stopping at the first non-empty value would freeze the slug after one keystroke.
#[derive(Debug, Default)]
pub struct SlugSync {
    last_generated: Option<String>,
}

impl SlugSync {
    pub fn next(&mut self, current_slug: &str, name: &str) -> Option<String> {
        let ours = self.last_generated.as_deref() == Some(current_slug);
        if !current_slug.is_empty() && !ours {
            return None;
        }
        let slug = generate_slug(name);
        self.last_generated = Some(slug.clone());
        Some(slug)
    }
}

fn slug_field_for(doc: &Document, name: &HtmlInputElement) -> Option<HtmlInputElement> {
    let scoped = name
        .form()
        .and_then(|f| f.query_selector("input[name=\"slug\"]").ok().flatten());
    scoped
        .or_else(|| doc.get_element_by_id("slug"))
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
}

pub fn init() -> Result<()> {
    let doc = document()?;
    for name in query_all::<HtmlInputElement>(&doc, "input[name=\"name\"]")? {
        let Some(slug) = slug_field_for(&doc, &name) else {
            continue;
        };
        let sync = Rc::new(RefCell::new(SlugSync::default()));
        let source = name.clone();
        listen(&name, "input", move |_| {
            let generated = sync.borrow_mut().next(&slug.value(), &source.value());
            if let Some(value) = generated {
                slug.set_value(&value);
            }
        })?;
    }
    Ok(())
}
