use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

/// Viewport widths at or below this are treated as the mobile layout.
pub const DEFAULT_BREAKPOINT: u32 = 767;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    pub brand: String,
    pub home_href: String,
    pub nav_links: Vec<NavLink>,
    pub breakpoint: u32,
    pub storage_key: String,
    pub theme_attribute: String,
    pub labels: Labels,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// User-facing strings. Theme texts name the theme the button switches *to*.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub menu_button: String,
    pub navigation: String,
    pub switch_to_dark: String,
    pub switch_to_light: String,
    pub switch_to_dark_aria: String,
    pub switch_to_light_aria: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            menu_button: "Open menu".to_string(),
            navigation: "Main navigation".to_string(),
            switch_to_dark: "Dark Theme".to_string(),
            switch_to_light: "Light Theme".to_string(),
            switch_to_dark_aria: "Switch to dark theme".to_string(),
            switch_to_light_aria: "Switch to light theme".to_string(),
        }
    }
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            brand: "Booking+".to_string(),
            home_href: "index.html".to_string(),
            nav_links: vec![
                NavLink::new("Dashboard", "dashboard.html"),
                NavLink::new("Services", "services.html"),
                NavLink::new("Clients", "clients.html"),
                NavLink::new("Scheduling", "scheduling.html"),
                NavLink::new("Profile", "profile.html"),
            ],
            breakpoint: DEFAULT_BREAKPOINT,
            storage_key: "theme".to_string(),
            theme_attribute: "data-theme".to_string(),
            labels: Labels::default(),
        }
    }
}

impl ChromeConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ChromeConfig =
            serde_json::from_str(r#"{"brand":"Acme","labels":{"navigation":"Site"}}"#).unwrap();
        assert_eq!(cfg.brand, "Acme");
        assert_eq!(cfg.labels.navigation, "Site");
        assert_eq!(cfg.labels.switch_to_dark, "Dark Theme");
        assert_eq!(cfg.breakpoint, DEFAULT_BREAKPOINT);
        assert_eq!(cfg.nav_links.len(), 5);
    }
}
