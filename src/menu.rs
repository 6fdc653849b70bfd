// Mobile navigation toggle
use crate::dom::{Element, EventKind};
use crate::model::DomError;
use tracing::{debug, warn};

pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const DEFAULT_OPEN_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Collapsed,
    Expanded,
}

impl MenuState {
    /// Reads the state from the panel's markup: the open class means expanded.
    pub fn of<E: Element>(panel: &E, open_class: &str) -> Self {
        Self::from_shown(panel.has_class(open_class))
    }

    pub fn from_shown(shown: bool) -> Self {
        if shown {
            MenuState::Expanded
        } else {
            MenuState::Collapsed
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            MenuState::Collapsed => MenuState::Expanded,
            MenuState::Expanded => MenuState::Collapsed,
        }
    }

    pub fn aria_value(self) -> &'static str {
        match self {
            MenuState::Collapsed => "false",
            MenuState::Expanded => "true",
        }
    }
}

/// Binds a trigger to the panel it shows and hides.
pub struct MenuController<E: Element> {
    trigger: E,
    panel: E,
    open_class: String,
}

impl<E: Element> MenuController<E> {
    /// Attaches the single click handler. The current markup is left untouched.
    pub fn wire(trigger: E, panel: E, open_class: &str) -> Result<Self, DomError> {
        let controller = Self {
            trigger,
            panel,
            open_class: open_class.to_string(),
        };
        let panel = controller.panel.clone();
        let open_class = controller.open_class.clone();
        controller.trigger.add_listener(
            EventKind::Click,
            Box::new(move |trigger: &E| {
                if let Err(e) = toggle(trigger, &panel, &open_class) {
                    warn!("Menu toggle failed: {}", e);
                }
            }),
        )?;
        Ok(controller)
    }

    pub fn state(&self) -> MenuState {
        MenuState::of(&self.panel, &self.open_class)
    }
}

/// Flips the panel's visibility and mirrors the result into `aria-expanded`.
pub fn toggle<E: Element>(
    trigger: &E,
    panel: &E,
    open_class: &str,
) -> Result<MenuState, DomError> {
    let state = MenuState::from_shown(panel.toggle_class(open_class)?);
    trigger.set_attribute(ARIA_EXPANDED, state.aria_value())?;
    debug!("Menu {:?}", state);
    Ok(state)
}
