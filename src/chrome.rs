use kuchiki::NodeRef;
use serde::Serialize;
use url::Url;

use crate::active_link;
use crate::config::ChromeConfig;
use crate::header::{self, HeaderOutcome, NAV_LINK_CLASS, THEME_TOGGLE_ID};
use crate::menu::{MenuController, MenuState, MenuTrigger, Viewport};
use crate::page::{self, Page};
use crate::theme::{self, Theme};

/// Host events, delivered one at a time.
#[derive(Debug, Clone)]
pub enum Event {
    Click(NodeRef),
    KeyDown(String),
    Resize(u32),
    /// Page shown, possibly at a new location after history navigation.
    PageShow(Option<Url>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub header: bool,
    pub menu: Option<MenuState>,
    pub theme: Theme,
    pub scroll_locked: bool,
    pub active_links: Vec<String>,
}

/// Installed header, menu and theme wiring for one page.
///
/// Installing again on the same page returns a fresh instance; handlers are
/// owned by the value, so replacing it never stacks duplicate listeners.
pub struct SiteChrome {
    config: ChromeConfig,
    menu: Option<MenuController>,
    header: HeaderOutcome,
    active_links: Vec<String>,
}

impl SiteChrome {
    pub fn install(page: &Page, config: ChromeConfig) -> Self {
        let header = header::inject_header(page, &config);
        let menu = MenuController::wire(page);
        let theme = theme::initialize(page, &config);
        let active_links = active_link::highlight_active_links(page, &config.home_href);
        tracing::info!(
            ?header,
            menu = menu.is_some(),
            %theme,
            location = %page.location(),
            "site chrome installed"
        );
        Self {
            config,
            menu,
            header,
            active_links,
        }
    }

    pub fn header_outcome(&self) -> HeaderOutcome {
        self.header
    }

    pub fn menu_state(&self) -> Option<MenuState> {
        self.menu.as_ref().map(MenuController::state)
    }

    pub fn active_links(&self) -> &[String] {
        &self.active_links
    }

    fn viewport(&self, page: &Page) -> Viewport {
        Viewport {
            width: page.viewport_width(),
            breakpoint: self.config.breakpoint,
        }
    }

    pub fn toggle_theme(&self, page: &mut Page) -> Theme {
        theme::toggle_theme(page, &self.config)
    }

    pub fn dispatch(&mut self, page: &mut Page, event: &Event) {
        tracing::trace!(?event, "dispatch");
        match event {
            Event::Click(target) => self.on_click(page, target),
            Event::KeyDown(key) if key == "Escape" => {
                let viewport = self.viewport(page);
                if let Some(menu) = self.menu.as_mut().filter(|m| m.state().is_open()) {
                    menu.apply(MenuTrigger::Escape, viewport);
                }
            }
            Event::KeyDown(_) => {}
            Event::Resize(width) => {
                page.set_viewport_width(*width);
                let viewport = self.viewport(page);
                if let Some(menu) = self.menu.as_mut() {
                    menu.apply(MenuTrigger::Resize, viewport);
                }
            }
            Event::PageShow(location) => {
                if let Some(location) = location {
                    page.set_location(location.clone());
                }
                self.active_links =
                    active_link::highlight_active_links(page, &self.config.home_href);
            }
        }
    }

    /// Element handlers first, then the document-level outside-click closer,
    /// unless the menu button stopped propagation.
    fn on_click(&mut self, page: &mut Page, target: &NodeRef) {
        let viewport = self.viewport(page);

        if let Some(menu) = self.menu.as_mut() {
            if menu.view().button_contains(target) {
                menu.apply(MenuTrigger::ButtonClick, viewport);
                return;
            }
        }

        if let Some(toggle) = page.element_by_id(THEME_TOGGLE_ID) {
            if page::contains(&toggle, target) {
                theme::toggle_theme(page, &self.config);
            }
        }

        let Some(menu) = self.menu.as_mut() else {
            return;
        };

        let on_nav_link = target
            .inclusive_ancestors()
            .any(|n| page::has_class(&n, NAV_LINK_CLASS));
        if on_nav_link {
            menu.apply(MenuTrigger::LinkClick, viewport);
        }

        let outside = !menu.view().contains(target) && !menu.view().button_contains(target);
        if outside && menu.state().is_open() {
            menu.apply(MenuTrigger::OutsideClick, viewport);
        }
    }

    pub fn summary(&self, page: &Page) -> Summary {
        Summary {
            header: page.select_first("header").is_some(),
            menu: self.menu_state(),
            theme: theme::current_theme(page, &self.config),
            scroll_locked: page
                .body()
                .and_then(|body| page::style_property(&body, "overflow"))
                .is_some_and(|v| v == "hidden"),
            active_links: self.active_links.clone(),
        }
    }
}
