use crate::config::PageConfig;
use crate::error::Result;
use crate::state::PageContext;
use crate::toast::Severity;
use crate::toolkit::Toolkit;
use crate::util::{document, listen};
use crate::{clipboard, forms, modal, navbar, scroll, slug, theme, toast};
use wasm_bindgen::prelude::*;

type Step = fn(&PageContext) -> Result<()>;

fn init_tooltips(ctx: &PageContext) -> Result<()> {
    let created = ctx.toolkit.init_tooltips(&document()?)?;
    log::debug!("{created} tooltips");
    Ok(())
}

/// Every behavior on the page, wired once at load.
pub struct PageBehaviors {
    ctx: PageContext,
}

impl PageBehaviors {
    pub fn new(config: PageConfig) -> Self {
        Self {
            ctx: PageContext::new(config, Toolkit::detect()),
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn steps() -> [(&'static str, Step); 11] {
        [
            ("toasts", toast::show_prerendered),
            ("delete-modal", modal::init),
            ("theme", |_| theme::init()),
            ("smooth-scroll", scroll::init_smooth_scroll),
            ("reveal", scroll::init_reveal),
            ("forms", forms::init),
            ("slug", |_| slug::init()),
            ("navbar", navbar::init),
            ("clipboard", clipboard::init),
            ("tooltips", init_tooltips),
            ("ready", |ctx| {
                log::info!(
                    "page behaviors ready (toolkit: {})",
                    if ctx.toolkit.is_available() { "yes" } else { "no" }
                );
                Ok(())
            }),
        ]
    }

    /// Runs every behavior; one failing never stops the rest. Returns the failure count.
    pub fn init_all(&self) -> usize {
        let mut failed = 0;
        for (name, step) in Self::steps() {
            if let Err(e) = step(&self.ctx) {
                log::warn!("{name} disabled: {e}");
                failed += 1;
            }
        }
        failed
    }
}

/// Initializes once the markup is parsed.
pub fn start(config: PageConfig) {
    let doc = match document() {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("page behaviors not started: {e}");
            return;
        }
    };

    if doc.ready_state() != "loading" {
        PageBehaviors::new(config).init_all();
        return;
    }

    let mut config = Some(config);
    let bound = listen(&doc, "DOMContentLoaded", move |_| {
        if let Some(config) = config.take() {
            PageBehaviors::new(config).init_all();
        }
    });
    if let Err(e) = bound {
        log::error!("page behaviors not started: {e}");
    }
}

/// `showToast(message, severity)` for inline template scripts.
#[wasm_bindgen(js_name = showToast)]
pub fn show_toast_js(message: &str, severity: Option<String>) {
    let severity = severity
        .and_then(|s| s.parse::<Severity>().ok())
        .unwrap_or_default();
    let ctx = PageContext::new(PageConfig::from_window(), Toolkit::detect());
    if let Err(e) = toast::show_toast(&ctx, message, severity) {
        log::warn!("showToast failed: {e}");
    }
}

#[wasm_bindgen(js_name = generateSlug)]
pub fn generate_slug_js(text: &str) -> String {
    slug::generate_slug(text)
}
