use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::ChromeConfig;
use crate::header::{THEME_TEXT_CLASS, THEME_TOGGLE_ID};
use crate::page::{self, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme {other:?}"),
        }
    }
}

/// Stored preference, falling back to light when absent or unrecognized.
pub fn stored_theme(page: &Page, config: &ChromeConfig) -> Theme {
    let Some(raw) = page.store().get(&config.storage_key) else {
        return Theme::default();
    };
    raw.parse().unwrap_or_else(|err| {
        tracing::warn!(error = %err, key = %config.storage_key, "ignoring stored theme");
        Theme::default()
    })
}

/// What the document root currently says. Anything but `light` counts as dark
/// so that a toggle from an unknown state always lands on light.
pub fn current_theme(page: &Page, config: &ChromeConfig) -> Theme {
    let attr = page
        .root()
        .and_then(|root| page::attr(&root, &config.theme_attribute));
    match attr.as_deref() {
        Some("light") => Theme::Light,
        _ => Theme::Dark,
    }
}

pub fn apply_theme(page: &Page, config: &ChromeConfig, theme: Theme) {
    if let Some(root) = page.root() {
        page::set_attr(&root, &config.theme_attribute, theme.as_str());
    }
}

fn save_theme(page: &mut Page, config: &ChromeConfig, theme: Theme) {
    if let Err(err) = page.store_mut().set(&config.storage_key, theme.as_str()) {
        tracing::warn!(error = %err, "failed to persist theme");
    }
}

/// Label the toggle with the theme it would switch to.
pub fn update_theme_button(page: &Page, config: &ChromeConfig, active: Theme) {
    let Some(button) = page.element_by_id(THEME_TOGGLE_ID) else {
        return;
    };
    let labels = &config.labels;
    let (text, aria) = match active {
        Theme::Light => (&labels.switch_to_dark, &labels.switch_to_dark_aria),
        Theme::Dark => (&labels.switch_to_light, &labels.switch_to_light_aria),
    };
    let text_node = button
        .select_first(&format!(".{THEME_TEXT_CLASS}"))
        .ok()
        .map(|n| n.as_node().clone());
    page::set_text(text_node.as_ref().unwrap_or(&button), text);
    page::set_attr(&button, "aria-label", aria);
}

/// Read the stored preference and reflect it onto the page.
pub fn initialize(page: &Page, config: &ChromeConfig) -> Theme {
    let theme = stored_theme(page, config);
    apply_theme(page, config, theme);
    update_theme_button(page, config, theme);
    tracing::debug!(%theme, "theme initialized");
    theme
}

/// Flip the page theme and persist the choice. Usable from any page, wired or not.
pub fn toggle_theme(page: &mut Page, config: &ChromeConfig) -> Theme {
    let next = current_theme(page, config).opposite();
    apply_theme(page, config, next);
    save_theme(page, config, next);
    update_theme_button(page, config, next);
    tracing::info!(theme = %next, "theme switched");
    next
}
