// In-memory document used by the prerender binary and by tests.
// The tree is scraper's own, so parsing and serialization both go through html5ever.
use super::{Document, Element, EventKind, Listener};
use crate::model::DomError;
use ego_tree::NodeId;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element as HtmlElement, Text};
use scraper::{CaseSensitivity, ElementRef, Html, Node, StrTendril};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const EMPTY_DOCUMENT: &str = "<!DOCTYPE html><html><head></head><body></body></html>";

enum ReadyState {
    Loading(Vec<Box<dyn FnOnce()>>),
    Complete,
}

struct DocumentState {
    html: Html,
    listeners: HashMap<NodeId, Vec<(EventKind, Listener<MemoryElement>)>>,
    ready: ReadyState,
}

/// Handle to one element node. Elements made by `create_element` stay detached
/// until appended somewhere.
#[derive(Clone)]
pub struct MemoryElement {
    state: Rc<RefCell<DocumentState>>,
    node: NodeId,
}

impl MemoryElement {
    pub fn tag(&self) -> String {
        self.with_element(|element| element.name().to_string())
            .unwrap_or_default()
    }

    pub fn id(&self) -> Option<String> {
        self.with_element(|element| element.id().map(str::to_string))
            .flatten()
    }

    pub fn child_elements(&self) -> Vec<MemoryElement> {
        let ids: Vec<NodeId> = {
            let state = self.state.borrow();
            match state.html.tree.get(self.node) {
                Some(node) => node
                    .children()
                    .filter(|child| child.value().is_element())
                    .map(|child| child.id())
                    .collect(),
                None => Vec::new(),
            }
        };
        ids.into_iter().map(|id| self.sibling_handle(id)).collect()
    }

    /// Descendants (not including `self`) carrying `class`, in document order.
    pub fn descendants_with_class(&self, class: &str) -> Vec<MemoryElement> {
        let ids: Vec<NodeId> = {
            let state = self.state.borrow();
            match state.html.tree.get(self.node) {
                Some(node) => node
                    .descendants()
                    .skip(1)
                    .filter(|descendant| {
                        descendant
                            .value()
                            .as_element()
                            .is_some_and(|e| e.has_class(class, CaseSensitivity::CaseSensitive))
                    })
                    .map(|descendant| descendant.id())
                    .collect(),
                None => Vec::new(),
            }
        };
        ids.into_iter().map(|id| self.sibling_handle(id)).collect()
    }

    /// Fires every listener registered for `event` and returns how many ran.
    pub fn dispatch(&self, event: EventKind) -> usize {
        // Listeners are taken out so they can borrow the document themselves.
        let mut listeners = self
            .state
            .borrow_mut()
            .listeners
            .remove(&self.node)
            .unwrap_or_default();
        let mut fired = 0;
        for (kind, listener) in listeners.iter_mut() {
            if *kind == event {
                listener(self);
                fired += 1;
            }
        }
        let mut state = self.state.borrow_mut();
        let added = state.listeners.remove(&self.node).unwrap_or_default();
        listeners.extend(added);
        if !listeners.is_empty() {
            state.listeners.insert(self.node, listeners);
        }
        fired
    }

    pub fn listener_count(&self, event: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .get(&self.node)
            .map_or(0, |listeners| {
                listeners.iter().filter(|(kind, _)| *kind == event).count()
            })
    }

    pub fn outer_html(&self) -> String {
        self.with_element_ref(|element| element.html())
            .unwrap_or_default()
    }

    pub fn inner_html(&self) -> String {
        self.with_element_ref(|element| element.inner_html())
            .unwrap_or_default()
    }

    fn sibling_handle(&self, node: NodeId) -> MemoryElement {
        MemoryElement {
            state: self.state.clone(),
            node,
        }
    }

    fn with_element_ref<R>(&self, read: impl FnOnce(ElementRef<'_>) -> R) -> Option<R> {
        let state = self.state.borrow();
        let node = state.html.tree.get(self.node)?;
        ElementRef::wrap(node).map(read)
    }

    fn with_element<R>(&self, read: impl FnOnce(&HtmlElement) -> R) -> Option<R> {
        self.with_element_ref(|element| read(element.value()))
    }

    /// Rebuilds the element with edited attributes. scraper caches id and classes
    /// per element, so attributes are never patched in place.
    fn edit_attributes(&self, edit: impl FnOnce(&mut Vec<Attribute>)) {
        let mut state = self.state.borrow_mut();
        let Some(mut node) = state.html.tree.get_mut(self.node) else {
            return;
        };
        if let Node::Element(element) = node.value() {
            let mut attributes: Vec<Attribute> = element
                .attrs
                .iter()
                .map(|(name, value)| Attribute {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect();
            edit(&mut attributes);
            *element = HtmlElement::new(element.name.clone(), attributes);
        }
    }

    fn store_attribute(&self, name: &str, value: &str) {
        self.edit_attributes(|attributes| {
            let value = StrTendril::from_slice(value);
            let existing = attributes
                .iter_mut()
                .find(|attribute| is_plain_attribute(&attribute.name, name));
            match existing {
                Some(existing) => existing.value = value,
                None => attributes.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value,
                }),
            }
        });
    }

    /// Checks that `child` may be attached under `self` without forming a cycle.
    fn check_attachable(&self, child: &MemoryElement) -> Result<(), DomError> {
        if !Rc::ptr_eq(&self.state, &child.state) {
            return Err(DomError::Attach("element belongs to another document".into()));
        }
        let state = self.state.borrow();
        let node = state
            .html
            .tree
            .get(self.node)
            .ok_or_else(|| DomError::Attach("unknown parent node".into()))?;
        if node.id() == child.node || node.ancestors().any(|ancestor| ancestor.id() == child.node) {
            return Err(DomError::Attach("element cannot contain itself".into()));
        }
        Ok(())
    }

    fn detach_children(&self, state: &mut DocumentState) -> Result<(), DomError> {
        let mut node = state
            .html
            .tree
            .get_mut(self.node)
            .ok_or_else(|| DomError::Attach("unknown parent node".into()))?;
        while let Some(mut child) = node.first_child() {
            child.detach();
        }
        Ok(())
    }
}

fn is_plain_attribute(qualified: &QualName, name: &str) -> bool {
    qualified.ns == Namespace::from("") && &*qualified.local == name
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.tag())
            .field("node", &self.node)
            .finish()
    }
}

impl Element for MemoryElement {
    fn set_class_name(&self, class: &str) {
        self.store_attribute("class", class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.with_element(|element| element.has_class(class, CaseSensitivity::CaseSensitive))
            .unwrap_or(false)
    }

    fn toggle_class(&self, class: &str) -> Result<bool, DomError> {
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(DomError::ClassList(class.to_string()));
        }
        let current = self.attribute("class").unwrap_or_default();
        let mut tokens: Vec<&str> = current.split_whitespace().collect();
        let present = match tokens.iter().position(|token| *token == class) {
            Some(index) => {
                tokens.remove(index);
                false
            }
            None => {
                tokens.push(class);
                true
            }
        };
        self.store_attribute("class", &tokens.join(" "));
        Ok(present)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.with_element(|element| element.attr(name).map(str::to_string))
            .flatten()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        let valid = !name.is_empty()
            && !name
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '='));
        if !valid {
            return Err(DomError::Attribute {
                name: name.to_string(),
                reason: "invalid attribute name".into(),
            });
        }
        self.store_attribute(name, value);
        Ok(())
    }

    fn set_text(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        if self.detach_children(&mut state).is_err() || text.is_empty() {
            return;
        }
        if let Some(mut node) = state.html.tree.get_mut(self.node) {
            node.append(Node::Text(Text {
                text: StrTendril::from_slice(text),
            }));
        }
    }

    fn text(&self) -> String {
        self.with_element_ref(|element| element.text().collect())
            .unwrap_or_default()
    }

    fn append_child(&self, child: &Self) -> Result<(), DomError> {
        self.check_attachable(child)?;
        let mut state = self.state.borrow_mut();
        let mut node = state
            .html
            .tree
            .get_mut(self.node)
            .ok_or_else(|| DomError::Attach("unknown parent node".into()))?;
        node.append_id(child.node);
        Ok(())
    }

    fn replace_children(&self, children: &[Self]) -> Result<(), DomError> {
        for child in children {
            self.check_attachable(child)?;
        }
        let mut state = self.state.borrow_mut();
        self.detach_children(&mut state)?;
        let mut node = state
            .html
            .tree
            .get_mut(self.node)
            .ok_or_else(|| DomError::Attach("unknown parent node".into()))?;
        for child in children {
            node.append_id(child.node);
        }
        Ok(())
    }

    fn add_listener(&self, event: EventKind, listener: Listener<Self>) -> Result<(), DomError> {
        self.state
            .borrow_mut()
            .listeners
            .entry(self.node)
            .or_default()
            .push((event, listener));
        Ok(())
    }
}

/// Document whose ready signal is fired explicitly via [`MemoryDocument::fire_ready`].
#[derive(Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
    /// Empty `<!DOCTYPE html><html><head></head><body></body></html>` document.
    pub fn new() -> Self {
        Self::parse(EMPTY_DOCUMENT)
    }

    pub fn parse(html: &str) -> Self {
        Self {
            state: Rc::new(RefCell::new(DocumentState {
                html: Html::parse_document(html),
                listeners: HashMap::new(),
                ready: ReadyState::Loading(Vec::new()),
            })),
        }
    }

    pub fn root(&self) -> MemoryElement {
        let node = self.state.borrow().html.root_element().id();
        self.handle(node)
    }

    pub fn body(&self) -> Option<MemoryElement> {
        self.root()
            .child_elements()
            .into_iter()
            .find(|element| element.tag() == "body")
    }

    /// Runs pending ready callbacks. Only the first call fires; later calls return false.
    pub fn fire_ready(&self) -> bool {
        let previous = std::mem::replace(&mut self.state.borrow_mut().ready, ReadyState::Complete);
        match previous {
            ReadyState::Loading(callbacks) => {
                for callback in callbacks {
                    callback();
                }
                true
            }
            ReadyState::Complete => false,
        }
    }

    pub fn to_html(&self) -> String {
        self.state.borrow().html.html()
    }

    fn handle(&self, node: NodeId) -> MemoryElement {
        MemoryElement {
            state: self.state.clone(),
            node,
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        let node = {
            let state = self.state.borrow();
            state
                .html
                .tree
                .root()
                .descendants()
                .find(|node| node.value().as_element().and_then(|e| e.id()) == Some(id))
                .map(|node| node.id())
        };
        node.map(|node| self.handle(node))
    }

    fn create_element(&self, tag: &str) -> Result<MemoryElement, DomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::CreateElement(tag.to_string()));
        }
        let name = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(tag.to_ascii_lowercase()),
        );
        let node = self
            .state
            .borrow_mut()
            .html
            .tree
            .orphan(Node::Element(HtmlElement::new(name, Vec::new())))
            .id();
        Ok(self.handle(node))
    }

    fn on_ready(&self, callback: Box<dyn FnOnce()>) -> Result<(), DomError> {
        let callback = match &mut self.state.borrow_mut().ready {
            ReadyState::Loading(callbacks) => {
                callbacks.push(callback);
                return Ok(());
            }
            ReadyState::Complete => callback,
        };
        // Already parsed: run now, outside the borrow.
        callback();
        Ok(())
    }
}
