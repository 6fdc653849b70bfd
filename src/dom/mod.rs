// DOM seam: the page only talks to the document through these traits.

pub mod memory;
#[cfg(feature = "web")]
pub mod web;

use crate::model::DomError;

pub use memory::{MemoryDocument, MemoryElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    /// Resource failed to load, e.g. a broken `<img src>`.
    Error,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Error => "error",
        }
    }
}

/// Handler invoked with the element the listener was registered on.
pub type Listener<E> = Box<dyn FnMut(&E)>;

pub trait Document {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn create_element(&self, tag: &str) -> Result<Self::Element, DomError>;

    /// Runs `callback` once the markup has been parsed.
    fn on_ready(&self, callback: Box<dyn FnOnce()>) -> Result<(), DomError>;
}

pub trait Element: Clone + 'static {
    fn set_class_name(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Returns whether the class is present after toggling.
    fn toggle_class(&self, class: &str) -> Result<bool, DomError>;

    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError>;

    /// Replaces all children with a single text node.
    fn set_text(&self, text: &str);

    fn text(&self) -> String;

    fn append_child(&self, child: &Self) -> Result<(), DomError>;

    fn replace_children(&self, children: &[Self]) -> Result<(), DomError>;

    fn add_listener(&self, event: EventKind, listener: Listener<Self>) -> Result<(), DomError>;
}
