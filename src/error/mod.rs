use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PageError {
    #[error("no global window")]
    MissingWindow,

    #[error("window has no document")]
    MissingDocument,

    /// A value thrown from the JS side, stringified.
    #[error("js error: {0}")]
    Js(String),

    #[error("presentation toolkit is not loaded")]
    ToolkitUnavailable,

    #[error("invalid page config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PageError>;

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        // Thrown `Error` objects stringify poorly through Debug; prefer their message.
        if let Some(s) = value.as_string() {
            return PageError::Js(s);
        }
        match js_sys::Reflect::get(&value, &"message".into()) {
            Ok(msg) if msg.is_string() => PageError::Js(msg.as_string().unwrap_or_default()),
            _ => PageError::Js(format!("{value:?}")),
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(value: serde_json::Error) -> Self {
        PageError::InvalidConfig(value.to_string())
    }
}
