use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Global the server template may define to override timing and selectors.
pub(crate) const CONFIG_GLOBAL: &str = "PYSAVE_CONFIG";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub toast_delay_ms: u32,
    pub header_offset_px: f64,
    pub scroll_duration_ms: f64,
    pub invalid_marker_ms: u32,
    pub loading_reset_ms: u32,
    pub navbar_threshold_px: f64,
    pub reveal_selector: String,
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            toast_delay_ms: 4500,
            header_offset_px: 80.0,
            scroll_duration_ms: 600.0,
            invalid_marker_ms: 2000,
            loading_reset_ms: 5000,
            navbar_threshold_px: 100.0,
            reveal_selector: ".card, .panel, .glass-panel, form".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `window.PYSAVE_CONFIG` if the page defines one.
    ///
    /// Anything unreadable falls back to defaults.
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Some(raw) = window.get(CONFIG_GLOBAL) else {
            return Self::default();
        };
        if raw.is_undefined() || raw.is_null() || !raw.is_object() {
            return Self::default();
        }

        let json = match js_sys::JSON::stringify(&raw) {
            Ok(s) => String::from(s),
            Err(_) => return Self::default(),
        };

        Self::from_json(&json).unwrap_or_else(|e| {
            // Logger may not be up yet; go straight to the console.
            web_sys::console::warn_1(&e.to_string().into());
            Self::default()
        })
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
