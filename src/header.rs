use kuchiki::traits::TendrilSink as _;
use maud::{Markup, html};

use crate::config::ChromeConfig;
use crate::page::Page;

pub const MENU_BUTTON_ID: &str = "menuBtn";
pub const MENU_ID: &str = "menu";
pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const THEME_TEXT_CLASS: &str = "theme-text";

pub const GLYPH_CLOSED: &str = "☰";
pub const GLYPH_OPEN: &str = "✕";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderOutcome {
    Inserted,
    /// A `<header>` was already present; nothing was created.
    Existing,
    NoBody,
}

pub fn header_markup(config: &ChromeConfig) -> Markup {
    let labels = &config.labels;
    html! {
        header {
            div class="header-content" {
                a href=(config.home_href) class="logo" { (config.brand) }
                button type="button" id=(MENU_BUTTON_ID) aria-label=(labels.menu_button) aria-expanded="false" {
                    (GLYPH_CLOSED)
                }
                nav id=(MENU_ID) class="nav-links" aria-label=(labels.navigation) {
                    @for link in &config.nav_links {
                        a href=(link.href) class=(NAV_LINK_CLASS) { (link.label) }
                    }
                }
                button type="button" id=(THEME_TOGGLE_ID) class="theme-toggle" aria-label=(labels.switch_to_dark_aria) {
                    span class=(THEME_TEXT_CLASS) { (labels.switch_to_dark) }
                }
            }
        }
    }
}

/// Insert the site header as the first child of `<body>` unless the page already has one.
pub fn inject_header(page: &Page, config: &ChromeConfig) -> HeaderOutcome {
    if page.select_first("header").is_some() {
        tracing::debug!("header already present; skipping creation");
        return HeaderOutcome::Existing;
    }
    let Some(body) = page.body() else {
        tracing::warn!("document has no body; header not inserted");
        return HeaderOutcome::NoBody;
    };

    let fragment = kuchiki::parse_html().one(header_markup(config).into_string());
    let Ok(header) = fragment.select_first("header") else {
        tracing::warn!("generated header markup did not parse to a <header>");
        return HeaderOutcome::NoBody;
    };
    let header = header.as_node().clone();
    header.detach();
    body.prepend(header);

    tracing::debug!(links = config.nav_links.len(), "header inserted");
    HeaderOutcome::Inserted
}
