//! Submission UX for the server-rendered forms.

use crate::error::Result;
use crate::state::PageContext;
use crate::toast::{show_toast, Severity};
use crate::util::{after_ms, document, listen, query_all, query_all_in};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

pub const REQUIRED_MESSAGE: &str = "Por favor, preencha todos os campos obrigatórios.";
pub const LOADING_LABEL: &str = "Processando...";
pub const INVALID_CLASS: &str = "is-invalid";

const SUBMIT_SELECTOR: &str = "button[type=\"submit\"], input[type=\"submit\"], button:not([type])";
const LOADING_HTML: &str =
    "<span class=\"spinner-border spinner-border-sm me-2\" role=\"status\" aria-hidden=\"true\"></span>Processando...";
const COUNTER_BOUND_ATTR: &str = "data-char-counter";

/// Indices of the values that are blank once trimmed.
pub fn missing_required<S: AsRef<str>>(values: &[S]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.as_ref().trim().is_empty())
        .map(|(i, _)| i)
        .collect()
}

pub fn counter_label(len: usize, max: usize) -> String {
    format!("{len} / {max} caracteres")
}

/// At or above 90% of the limit.
pub fn counter_near_limit(len: usize, max: usize) -> bool {
    max > 0 && len * 10 >= max * 9
}

/// `Some("3.00")` for `"3"`; `None` when the value isn't a finite number.
///
/// Rounds like JS `toFixed(2)`: exact ties go away from zero, where
/// `format!` would round them to even.
pub fn format_two_decimals(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    // A tie at the third decimal is only representable as an odd number of eighths.
    let eighths = value * 8.0;
    let tie = eighths.fract() == 0.0 && eighths % 2.0 != 0.0;
    let value = if tie {
        (value * 100.0).round() / 100.0
    } else {
        value
    };
    Some(format!("{value:.2}"))
}

fn field_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    el.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
}

fn mark_invalid(el: &Element, ms: u32) {
    let _ = el.class_list().add_1(INVALID_CLASS);
    let el = el.clone();
    after_ms(ms, move || {
        let _ = el.class_list().remove_1(INVALID_CLASS);
    });
}

fn bind_validation(ctx: &PageContext, form: &HtmlFormElement) -> Result<()> {
    let ctx = ctx.clone();
    let f = form.clone();
    listen(form, "submit", move |ev| {
        let Ok(fields) = query_all_in::<Element>(&f, "[required]") else {
            return;
        };
        let fields: Vec<(Element, String)> = fields
            .into_iter()
            .filter_map(|el| field_value(&el).map(|v| (el, v)))
            .collect();
        let values: Vec<&str> = fields.iter().map(|(_, v)| v.as_str()).collect();
        let missing = missing_required(&values);
        if missing.is_empty() {
            return;
        }

        ev.prevent_default();
        for i in missing {
            mark_invalid(&fields[i].0, ctx.config.invalid_marker_ms);
        }
        if let Err(e) = show_toast(&ctx, REQUIRED_MESSAGE, Severity::Warning) {
            log::debug!("validation toast failed: {e}");
        }
    })
}

/// The submit control and how to put its label back.
enum SubmitControl {
    Button(HtmlButtonElement, String),
    Input(HtmlInputElement, String),
}

impl SubmitControl {
    fn find(form: &HtmlFormElement) -> Option<Self> {
        let el = form.query_selector(SUBMIT_SELECTOR).ok().flatten()?;
        match el.dyn_into::<HtmlButtonElement>() {
            Ok(button) => {
                let original = button.inner_html();
                Some(Self::Button(button, original))
            }
            Err(el) => {
                let input = el.dyn_into::<HtmlInputElement>().ok()?;
                let original = input.value();
                Some(Self::Input(input, original))
            }
        }
    }

    fn start_loading(&self) {
        match self {
            Self::Button(button, _) => {
                button.set_inner_html(LOADING_HTML);
                button.set_disabled(true);
            }
            Self::Input(input, _) => {
                input.set_value(LOADING_LABEL);
                input.set_disabled(true);
            }
        }
    }

    fn restore(&self) {
        match self {
            Self::Button(button, original) => {
                if button.is_connected() {
                    button.set_inner_html(original);
                    button.set_disabled(false);
                }
            }
            Self::Input(input, original) => {
                if input.is_connected() {
                    input.set_value(original);
                    input.set_disabled(false);
                }
            }
        }
    }
}

/// Must be registered after `bind_validation` so a cancelled submit is visible here.
fn bind_loading_state(ctx: &PageContext, form: &HtmlFormElement) -> Result<()> {
    let reset_ms = ctx.config.loading_reset_ms;
    let f = form.clone();
    listen(form, "submit", move |ev| {
        if ev.default_prevented() {
            return;
        }
        let Some(control) = SubmitControl::find(&f) else {
            return;
        };
        control.start_loading();
        // Fallback for a navigation that never completes.
        after_ms(reset_ms, move || control.restore());
    })
}

pub(crate) fn bind_form(ctx: &PageContext, form: &HtmlFormElement) -> Result<()> {
    if form.method().eq_ignore_ascii_case("post") {
        bind_validation(ctx, form)?;
    }
    bind_loading_state(ctx, form)
}

fn render_counter(counter: &Element, value: &str, max: usize) {
    // `maxlength` counts UTF-16 code units.
    let len = value.encode_utf16().count();
    counter.set_text_content(Some(&counter_label(len, max)));
    let near = counter_near_limit(len, max);
    let classes = counter.class_list();
    let _ = classes.toggle_with_force("text-warning", near);
    let _ = classes.toggle_with_force("text-muted", !near);
}

pub(crate) fn bind_char_counter(doc: &Document, area: &HtmlTextAreaElement) -> Result<()> {
    let Ok(max) = usize::try_from(area.max_length()) else {
        return Ok(());
    };
    if max == 0 || area.has_attribute(COUNTER_BOUND_ATTR) {
        return Ok(());
    }
    area.set_attribute(COUNTER_BOUND_ATTR, "")?;

    let counter = doc.create_element("small")?;
    counter.set_class_name("form-text char-counter");
    area.after_with_node_1(&counter)?;
    render_counter(&counter, &area.value(), max);

    let a = area.clone();
    listen(area, "input", move |_| render_counter(&counter, &a.value(), max))
}

pub(crate) fn bind_two_decimal(input: &HtmlInputElement) -> Result<()> {
    let el = input.clone();
    listen(input, "blur", move |_| {
        if let Some(formatted) = format_two_decimals(&el.value()) {
            el.set_value(&formatted);
        }
    })
}

/// Binds every item, logging failures instead of stopping. Returns the failure count.
fn bind_each<T>(what: &str, items: Vec<T>, mut bind: impl FnMut(&T) -> Result<()>) -> usize {
    let mut failed = 0;
    for item in &items {
        if let Err(e) = bind(item) {
            log::warn!("{what} not bound: {e}");
            failed += 1;
        }
    }
    failed
}

pub fn init(ctx: &PageContext) -> Result<()> {
    let doc = document()?;
    bind_each(
        "form",
        query_all::<HtmlFormElement>(&doc, "form")?,
        |form| bind_form(ctx, form),
    );
    bind_each(
        "char counter",
        query_all::<HtmlTextAreaElement>(&doc, "textarea[maxlength]")?,
        |area| bind_char_counter(&doc, area),
    );
    bind_each(
        "decimal field",
        query_all::<HtmlInputElement>(&doc, "input[type=\"number\"][step=\"0.01\"]")?,
        bind_two_decimal,
    );
    Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::toast::TOAST_ZONE_ID;
    use crate::toolkit::Toolkit;
    use wasm_bindgen_test::*;
    use web_sys::{Event, EventInit};

    wasm_bindgen_test_configure!(run_in_browser);

    fn ctx() -> PageContext {
        PageContext::new(PageConfig::default(), Toolkit::unavailable())
    }

    fn submit_event() -> Event {
        let init = EventInit::new();
        init.set_cancelable(true);
        Event::new_with_event_init_dict("submit", &init).expect("submit event")
    }

    fn mount(html: &str) -> (Element, Element) {
        let doc = document().expect("document");
        let zone = doc.create_element("div").expect("zone");
        zone.set_id(TOAST_ZONE_ID);
        let root = doc.create_element("div").expect("root");
        root.set_inner_html(html);
        let body = doc.body().expect("body");
        body.append_child(&zone).expect("append zone");
        body.append_child(&root).expect("append root");
        (zone, root)
    }

    fn form_in(root: &Element) -> HtmlFormElement {
        root.query_selector("form")
            .ok()
            .flatten()
            .and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
            .expect("form")
    }

    fn toast_count(zone: &Element) -> u32 {
        zone.query_selector_all(".toast").map(|l| l.length()).unwrap_or(0)
    }

    #[wasm_bindgen_test]
    fn test_blank_required_cancels_with_one_warning() {
        let (zone, root) = mount(
            r#"<form method="post" action="/x">
                 <input name="title" required value="  ">
                 <button type="submit">Salvar</button>
               </form>"#,
        );
        let form = form_in(&root);
        bind_form(&ctx(), &form).expect("bind");

        let ev = submit_event();
        form.dispatch_event(&ev).expect("dispatch");

        assert!(ev.default_prevented());
        assert_eq!(toast_count(&zone), 1);
        let toast = zone.query_selector(".toast").ok().flatten().expect("toast");
        assert!(toast.class_list().contains("text-bg-warning"));

        let input = root.query_selector("input").ok().flatten().expect("input");
        assert!(input.class_list().contains(INVALID_CLASS));

        let button = root
            .query_selector("button")
            .ok()
            .flatten()
            .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok())
            .expect("button");
        assert!(!button.disabled());

        zone.remove();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_filled_required_submits_and_shows_loading() {
        let (zone, root) = mount(
            r#"<form method="post" action="/x">
                 <input name="title" required value="Diário">
                 <button type="submit">Salvar</button>
               </form>"#,
        );
        let form = form_in(&root);
        bind_form(&ctx(), &form).expect("bind");

        let ev = submit_event();
        form.dispatch_event(&ev).expect("dispatch");

        assert!(!ev.default_prevented());
        assert_eq!(toast_count(&zone), 0);
        let button = root
            .query_selector("button")
            .ok()
            .flatten()
            .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok())
            .expect("button");
        assert!(button.disabled());
        assert_eq!(button.text_content().as_deref(), Some(LOADING_LABEL));

        zone.remove();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_char_counter_tracks_input() {
        let (zone, root) = mount(r#"<textarea maxlength="100"></textarea>"#);
        let doc = document().expect("document");
        let area = root
            .query_selector("textarea")
            .ok()
            .flatten()
            .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
            .expect("textarea");
        bind_char_counter(&doc, &area).expect("bind");

        let counter = root.query_selector(".char-counter").ok().flatten().expect("counter");
        assert_eq!(counter.text_content().as_deref(), Some("0 / 100 caracteres"));

        area.set_value(&"a".repeat(42));
        area.dispatch_event(&Event::new("input").expect("input")).expect("dispatch");
        assert_eq!(counter.text_content().as_deref(), Some("42 / 100 caracteres"));
        assert!(!counter.class_list().contains("text-warning"));

        area.set_value(&"a".repeat(90));
        area.dispatch_event(&Event::new("input").expect("input")).expect("dispatch");
        assert!(counter.class_list().contains("text-warning"));

        // Binding twice must not add a second counter.
        bind_char_counter(&doc, &area).expect("rebind");
        assert_eq!(
            root.query_selector_all(".char-counter").map(|l| l.length()).unwrap_or(0),
            1
        );

        zone.remove();
        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_two_decimal_blur() {
        let (zone, root) = mount(r#"<input type="number" step="0.01">"#);
        let input = root
            .query_selector("input")
            .ok()
            .flatten()
            .and_then(|i| i.dyn_into::<HtmlInputElement>().ok())
            .expect("input");
        bind_two_decimal(&input).expect("bind");

        input.set_value("3");
        input.dispatch_event(&Event::new("blur").expect("blur")).expect("dispatch");
        assert_eq!(input.value(), "3.00");

        // A number input sanitizes garbage to "", which stays "".
        input.set_value("abc");
        input.dispatch_event(&Event::new("blur").expect("blur")).expect("dispatch");
        assert_eq!(input.value(), "");

        zone.remove();
        root.remove();
    }
}
