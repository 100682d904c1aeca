//! Client-side behaviors for the pySave Diário server-rendered pages.
//!
//! Built as a wasm module the base template loads once; each behavior binds
//! to markup the server already rendered and quietly skips what isn't there.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod forms;
pub mod modal;
pub mod navbar;
pub mod page;
pub mod scroll;
pub mod slug;
pub mod state;
mod storage;
pub mod theme;
pub mod toast;
pub mod toolkit;
mod util;

pub use config::PageConfig;
pub use error::{PageError, Result};
pub use page::PageBehaviors;
pub use slug::generate_slug;
pub use toast::{show_toast, Severity};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    let config = PageConfig::from_window();
    // Errs only if a logger is already installed.
    let _ = console_log::init_with_level(config.log_level());
    page::start(config);
}
