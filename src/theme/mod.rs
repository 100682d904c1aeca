use crate::error::Result;
use crate::storage::{load_from_storage, save_to_storage, THEME_KEY};
use crate::util::{document, listen};
use web_sys::Element;

pub const LIGHT_CLASS: &str = "light-theme";
pub const TOGGLE_ID: &str = "themeToggle";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Anything but `"light"` (including nothing stored) is dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub fn load_theme() -> Theme {
    Theme::from_stored(load_from_storage(THEME_KEY).as_deref())
}

pub fn save_theme(theme: Theme) {
    if !save_to_storage(THEME_KEY, theme.as_ref()) {
        log::debug!("theme preference not persisted");
    }
}

pub fn apply_theme(root: &Element, theme: Theme) {
    let classes = root.class_list();
    let _ = match theme {
        Theme::Light => classes.add_1(LIGHT_CLASS),
        Theme::Dark => classes.remove_1(LIGHT_CLASS),
    };
}

fn current_theme(root: &Element) -> Theme {
    if root.class_list().contains(LIGHT_CLASS) {
        Theme::Light
    } else {
        Theme::Dark
    }
}

pub fn init() -> Result<()> {
    let doc = document()?;
    let Some(root) = doc.document_element() else {
        return Ok(());
    };
    apply_theme(&root, load_theme());

    if let Some(toggle) = doc.get_element_by_id(TOGGLE_ID) {
        listen(&toggle, "click", move |_| {
            let next = current_theme(&root).toggled();
            apply_theme(&root, next);
            save_theme(next);
        })?;
    }
    Ok(())
}
