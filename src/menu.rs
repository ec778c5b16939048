use kuchiki::NodeRef;
use serde::Serialize;

use crate::header::{GLYPH_CLOSED, GLYPH_OPEN, MENU_BUTTON_ID, MENU_ID};
use crate::page::{self, Page};

const MENU_OPEN_CLASS: &str = "show";
const BUTTON_ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTrigger {
    ButtonClick,
    LinkClick,
    OutsideClick,
    Resize,
    Escape,
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub breakpoint: u32,
}

impl Viewport {
    /// Mobile layout. Every width-gated closer goes through this one predicate.
    pub fn is_narrow(self) -> bool {
        self.width <= self.breakpoint
    }
}

impl MenuState {
    pub fn is_open(self) -> bool {
        matches!(self, MenuState::Open)
    }

    pub fn next(self, trigger: MenuTrigger, viewport: Viewport) -> MenuState {
        match trigger {
            MenuTrigger::ButtonClick => match self {
                MenuState::Closed => MenuState::Open,
                MenuState::Open => MenuState::Closed,
            },
            MenuTrigger::LinkClick | MenuTrigger::OutsideClick if viewport.is_narrow() => {
                MenuState::Closed
            }
            MenuTrigger::Resize if !viewport.is_narrow() => MenuState::Closed,
            MenuTrigger::Escape => MenuState::Closed,
            _ => self,
        }
    }
}

/// The nodes a menu state is rendered onto.
#[derive(Debug, Clone)]
pub struct MenuView {
    pub button: NodeRef,
    pub menu: NodeRef,
    pub body: Option<NodeRef>,
}

impl MenuView {
    /// Both the toggle button and the panel must exist for the menu to be wired.
    pub fn locate(page: &Page) -> Option<Self> {
        let button = page.element_by_id(MENU_BUTTON_ID)?;
        let menu = page.element_by_id(MENU_ID)?;
        Some(Self {
            button,
            menu,
            body: page.body(),
        })
    }

    pub fn observed_state(&self) -> MenuState {
        if page::has_class(&self.menu, MENU_OPEN_CLASS) {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    /// Panel class, button class, `aria-expanded`, glyph and scroll lock all follow `state`.
    pub fn render(&self, state: MenuState) {
        self.render_controls(state);
        if let Some(body) = &self.body {
            page::set_style_property(body, "overflow", state.is_open().then_some("hidden"));
        }
    }

    /// Everything `render` touches except the body's scroll lock.
    fn render_controls(&self, state: MenuState) {
        let open = state.is_open();
        if open {
            page::add_class(&self.menu, MENU_OPEN_CLASS);
            page::add_class(&self.button, BUTTON_ACTIVE_CLASS);
        } else {
            page::remove_class(&self.menu, MENU_OPEN_CLASS);
            page::remove_class(&self.button, BUTTON_ACTIVE_CLASS);
        }
        page::set_attr(&self.button, "aria-expanded", if open { "true" } else { "false" });
        page::set_text(&self.button, if open { GLYPH_OPEN } else { GLYPH_CLOSED });
    }

    pub fn contains(&self, target: &NodeRef) -> bool {
        page::contains(&self.menu, target)
    }

    pub fn button_contains(&self, target: &NodeRef) -> bool {
        page::contains(&self.button, target)
    }
}

pub struct MenuController {
    view: MenuView,
    state: MenuState,
}

impl MenuController {
    pub fn wire(page: &Page) -> Option<Self> {
        let Some(view) = MenuView::locate(page) else {
            tracing::debug!("menu button or panel missing; menu not wired");
            return None;
        };
        // Body overflow belongs to the page until the menu itself opens or closes.
        let state = view.observed_state();
        match state {
            MenuState::Open => view.render(state),
            MenuState::Closed => view.render_controls(state),
        }
        Some(Self { view, state })
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn view(&self) -> &MenuView {
        &self.view
    }

    pub fn apply(&mut self, trigger: MenuTrigger, viewport: Viewport) -> MenuState {
        let next = self.state.next(trigger, viewport);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, ?trigger, width = viewport.width, "menu transition");
        }
        self.state = next;
        self.view.render(next);
        next
    }
}
