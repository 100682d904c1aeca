use crate::error::Result;
use crate::state::PageContext;
use crate::toolkit::Modal;
use crate::util::{data_attr, document, listen, query_all};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlFormElement};

pub const MODAL_ID: &str = "confirmModal";
pub const CONFIRM_BUTTON_ID: &str = "confirmModalBtn";
pub const TRIGGER_SELECTOR: &str = ".trigger-delete";

/// Something a confirmed delete can fire.
pub trait Submittable {
    fn submit_now(&self) -> Result<()>;
}

impl Submittable for HtmlFormElement {
    fn submit_now(&self) -> Result<()> {
        // `submit()` skips submit listeners, so validation/loading handlers don't run here.
        Ok(self.submit()?)
    }
}

/// The form waiting for the user to confirm its deletion. At most one.
#[derive(Debug)]
pub struct PendingDelete<T> {
    target: Option<T>,
}

impl<T> Default for PendingDelete<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T> PendingDelete<T> {
    /// Replaces whatever was pending before.
    pub fn arm(&mut self, target: T) {
        self.target = Some(target);
    }

    pub fn take(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    pub fn is_armed(&self) -> bool {
        self.target.is_some()
    }
}

impl<T: Submittable> PendingDelete<T> {
    /// Submits and clears the pending target. Returns whether anything was submitted.
    pub fn confirm(&mut self) -> Result<bool> {
        match self.take() {
            Some(target) => {
                target.submit_now()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub fn confirm_message(label: &str) -> String {
    format!("Tem certeza que deseja remover {label}?")
}

pub fn init(ctx: &PageContext) -> Result<()> {
    let doc = document()?;
    bind(&doc, ctx).map(|_| ())
}

pub(crate) fn bind(
    doc: &Document,
    ctx: &PageContext,
) -> Result<Rc<RefCell<PendingDelete<HtmlFormElement>>>> {
    let pending = Rc::new(RefCell::new(PendingDelete::<HtmlFormElement>::default()));
    let modal_el = doc.get_element_by_id(MODAL_ID);

    let dialog: Option<Rc<Modal>> = match &modal_el {
        Some(el) if ctx.toolkit.is_available() => match ctx.toolkit.modal(el) {
            Ok(m) => Some(Rc::new(m)),
            Err(e) => {
                log::warn!("delete confirmation disabled: {e}");
                None
            }
        },
        _ => None,
    };

    for trigger in query_all::<Element>(doc, TRIGGER_SELECTOR)? {
        let doc = doc.clone();
        let el = trigger.clone();
        let modal_el = modal_el.clone();
        let dialog = dialog.clone();
        let pending = Rc::clone(&pending);

        listen(&trigger, "click", move |ev| {
            // Even a submit-type trigger must never delete on its own.
            ev.prevent_default();

            let (Some(dialog), Some(modal_el)) = (&dialog, &modal_el) else {
                return;
            };
            let Some(form_id) = data_attr(&el, "form-id") else {
                log::warn!("delete trigger without data-form-id");
                return;
            };
            let Some(form) = doc
                .get_element_by_id(&form_id)
                .and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
            else {
                log::warn!("delete trigger points at missing form #{form_id}");
                return;
            };
            let label = data_attr(&el, "user-name")
                .or_else(|| data_attr(&el, "label"))
                .unwrap_or_default();

            if let Ok(Some(body)) = modal_el.query_selector(".modal-body") {
                body.set_text_content(Some(&confirm_message(&label)));
            }
            pending.borrow_mut().arm(form);
            dialog.show();
        })?;
    }

    if let Some(btn) = doc.get_element_by_id(CONFIRM_BUTTON_ID) {
        let dialog = dialog.clone();
        let pending = Rc::clone(&pending);
        listen(&btn, "click", move |_| {
            let result = pending.borrow_mut().confirm();
            if let Err(e) = result {
                log::warn!("confirmed delete failed to submit: {e}");
            }
            if let Some(dialog) = &dialog {
                dialog.hide();
            }
        })?;
    }

    if let Some(el) = &modal_el {
        let pending = Rc::clone(&pending);
        listen(el, "hidden.bs.modal", move |_| {
            pending.borrow_mut().clear();
        })?;
    }

    Ok(pending)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::PageConfig;
    use crate::toolkit::Toolkit;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_trigger_without_toolkit_is_noop() {
        let doc = document().expect("document");
        let root = doc.create_element("div").expect("root");
        root.set_inner_html(
            r#"<div id="confirmModal"><div class="modal-body">original</div></div>
               <form id="del-7" method="post" action="/users/7/delete"></form>
               <button type="button" class="trigger-delete" data-form-id="del-7" data-user-name="Ana">x</button>"#,
        );
        doc.body().expect("body").append_child(&root).expect("append");

        let ctx = PageContext::new(PageConfig::default(), Toolkit::unavailable());
        let pending = bind(&doc, &ctx).expect("bind");

        let trigger = root
            .query_selector(".trigger-delete")
            .ok()
            .flatten()
            .and_then(|t| t.dyn_into::<HtmlElement>().ok())
            .expect("trigger");
        trigger.click();

        assert!(!pending.borrow().is_armed());
        let body = root.query_selector(".modal-body").ok().flatten().expect("body");
        assert_eq!(body.text_content().as_deref(), Some("original"));

        root.remove();
    }

    const SUBMITS_GLOBAL: &str = "__pysaveSubmitCount";

    /// Installs a `bootstrap.Modal` that does nothing and counts `form.submit()` calls.
    /// Returns the real `submit` so the caller can put it back.
    fn install_fake_toolkit() -> JsValue {
        let window = web_sys::window().expect("window");

        let modal = js_sys::Function::new_no_args("this.show = function () {}; this.hide = function () {};");
        let bootstrap = js_sys::Object::new();
        js_sys::Reflect::set(&bootstrap, &"Modal".into(), &modal).expect("set Modal");
        js_sys::Reflect::set(&window, &"bootstrap".into(), &bootstrap).expect("set bootstrap");

        let proto = form_prototype();
        let original = js_sys::Reflect::get(&proto, &"submit".into()).expect("submit");
        let counting = js_sys::Function::new_no_args(&format!(
            "window.{SUBMITS_GLOBAL} = (window.{SUBMITS_GLOBAL} || 0) + 1;"
        ));
        js_sys::Reflect::set(&proto, &"submit".into(), &counting).expect("replace submit");
        js_sys::Reflect::set(&window, &SUBMITS_GLOBAL.into(), &JsValue::from(0)).expect("reset count");
        original
    }

    fn remove_fake_toolkit(original_submit: &JsValue) {
        let window = web_sys::window().expect("window");
        let _ = js_sys::Reflect::delete_property(&window, &"bootstrap".into());
        let _ = js_sys::Reflect::delete_property(&window, &SUBMITS_GLOBAL.into());
        let _ = js_sys::Reflect::set(&form_prototype(), &"submit".into(), original_submit);
    }

    fn form_prototype() -> JsValue {
        let window = web_sys::window().expect("window");
        let class = js_sys::Reflect::get(&window, &"HTMLFormElement".into()).expect("class");
        js_sys::Reflect::get(&class, &"prototype".into()).expect("prototype")
    }

    fn submit_count() -> f64 {
        let window = web_sys::window().expect("window");
        js_sys::Reflect::get(&window, &SUBMITS_GLOBAL.into())
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn click(root: &Element, selector: &str) {
        root.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            .expect(selector)
            .click();
    }

    #[wasm_bindgen_test]
    fn test_only_confirm_submits_and_only_after_a_trigger() {
        let original_submit = install_fake_toolkit();
        let toolkit = Toolkit::detect();
        assert!(toolkit.is_available());

        let doc = document().expect("document");
        let root = doc.create_element("div").expect("root");
        root.set_inner_html(
            r#"<div id="confirmModal"><div class="modal-body"></div>
                 <button type="button" id="confirmModalBtn">Remover</button></div>
               <form id="del-9" method="post" action="/users/9/delete"></form>
               <button type="submit" form="del-9" class="trigger-delete" data-form-id="del-9" data-user-name="Ana">x</button>"#,
        );
        doc.body().expect("body").append_child(&root).expect("append");

        let ctx = PageContext::new(PageConfig::default(), toolkit);
        let pending = bind(&doc, &ctx).expect("bind");

        click(&root, "#confirmModalBtn");
        assert_eq!(submit_count(), 0.0);

        click(&root, ".trigger-delete");
        assert!(pending.borrow().is_armed());
        assert_eq!(submit_count(), 0.0);
        let body = root.query_selector(".modal-body").ok().flatten().expect("body");
        assert_eq!(
            body.text_content().as_deref(),
            Some("Tem certeza que deseja remover Ana?")
        );

        click(&root, "#confirmModalBtn");
        assert_eq!(submit_count(), 1.0);
        assert!(!pending.borrow().is_armed());

        click(&root, ".trigger-delete");
        assert!(pending.borrow().is_armed());
        let modal_el = doc.get_element_by_id(MODAL_ID).expect("modal");
        modal_el
            .dispatch_event(&web_sys::Event::new("hidden.bs.modal").expect("event"))
            .expect("dispatch");
        assert!(!pending.borrow().is_armed());

        click(&root, "#confirmModalBtn");
        assert_eq!(submit_count(), 1.0);

        root.remove();
        remove_fake_toolkit(&original_submit);
    }
}
