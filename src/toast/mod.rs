use crate::error::Result;
use crate::state::PageContext;
use crate::util::{after_ms, document, query_all};
use std::str::FromStr;
use web_sys::{Document, Element};

pub const TOAST_ZONE_ID: &str = "toastZone";

/// Visual flavour of a toast. Styling only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            // Flask's flash() category for failures.
            "danger" | "error" => Ok(Self::Danger),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl Severity {
    pub(crate) fn css_class(self) -> String {
        format!("text-bg-{}", self.as_ref())
    }
}

/// Shows the toasts the server rendered into the zone.
pub fn show_prerendered(ctx: &PageContext) -> Result<()> {
    if !ctx.toolkit.is_available() {
        return Ok(());
    }
    let doc = document()?;
    for el in query_all::<Element>(&doc, &format!("#{TOAST_ZONE_ID} .toast"))? {
        if let Err(e) = ctx.toolkit.show_toast(&el, ctx.config.toast_delay_ms) {
            log::debug!("pre-rendered toast not shown: {e}");
        }
    }
    Ok(())
}

/// Appends a dismissible toast to the zone and schedules its removal.
///
/// Returns the created element, or `None` when the page has no toast zone.
pub fn show_toast(ctx: &PageContext, message: &str, severity: Severity) -> Result<Option<Element>> {
    let doc = document()?;
    let Some(zone) = doc.get_element_by_id(TOAST_ZONE_ID) else {
        log::debug!("no #{TOAST_ZONE_ID}; dropping toast: {message}");
        return Ok(None);
    };

    let toast = build_toast(&doc, message, severity)?;
    zone.append_child(&toast)?;

    if let Err(e) = ctx.toolkit.show_toast(&toast, ctx.config.toast_delay_ms) {
        log::debug!("toast appended but not shown: {e}");
    }

    let el = toast.clone();
    after_ms(ctx.config.toast_delay_ms, move || {
        if el.is_connected() {
            el.remove();
        }
    });

    Ok(Some(toast))
}

fn build_toast(doc: &Document, message: &str, severity: Severity) -> Result<Element> {
    let toast = doc.create_element("div")?;
    toast.set_class_name(&format!(
        "toast align-items-center border-0 {}",
        severity.css_class()
    ));
    toast.set_attribute("role", "alert")?;
    toast.set_attribute("aria-live", "assertive")?;
    toast.set_attribute("aria-atomic", "true")?;

    let row = doc.create_element("div")?;
    row.set_class_name("d-flex");

    let body = doc.create_element("div")?;
    body.set_class_name("toast-body");
    body.set_text_content(Some(message));

    let close = doc.create_element("button")?;
    close.set_attribute("type", "button")?;
    close.set_class_name("btn-close btn-close-white me-2 m-auto");
    close.set_attribute("data-bs-dismiss", "toast")?;
    close.set_attribute("aria-label", "Fechar")?;

    row.append_child(&body)?;
    row.append_child(&close)?;
    toast.append_child(&row)?;
    Ok(toast)
}
