// Browser backend over web-sys. Built with `--features web` for wasm32.
use super::{Document, Element, EventKind, Listener};
use crate::catalog::Catalog;
use crate::config::PageConfig;
use crate::model::DomError;
use crate::page;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[derive(Clone)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    /// The document of the current window, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self)
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.0.get_element_by_id(id).map(WebElement)
    }

    fn create_element(&self, tag: &str) -> Result<WebElement, DomError> {
        self.0
            .create_element(tag)
            .map(WebElement)
            .map_err(|_| DomError::CreateElement(tag.to_string()))
    }

    fn on_ready(&self, callback: Box<dyn FnOnce()>) -> Result<(), DomError> {
        if self.0.ready_state() != "loading" {
            callback();
            return Ok(());
        }
        let closure = Closure::once_into_js(move || callback());
        self.0
            .add_event_listener_with_callback("DOMContentLoaded", closure.unchecked_ref())
            .map_err(|_| DomError::Listener("DOMContentLoaded".into()))
    }
}

#[derive(Clone)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn raw(&self) -> &web_sys::Element {
        &self.0
    }
}

impl Element for WebElement {
    fn set_class_name(&self, class: &str) {
        self.0.set_class_name(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn toggle_class(&self, class: &str) -> Result<bool, DomError> {
        self.0
            .class_list()
            .toggle(class)
            .map_err(|_| DomError::ClassList(class.to_string()))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.0
            .set_attribute(name, value)
            .map_err(|e| DomError::Attribute {
                name: name.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn append_child(&self, child: &Self) -> Result<(), DomError> {
        self.0
            .append_child(&child.0)
            .map(|_| ())
            .map_err(|e| DomError::Attach(format!("{:?}", e)))
    }

    fn replace_children(&self, children: &[Self]) -> Result<(), DomError> {
        self.0.set_text_content(None);
        for child in children {
            self.append_child(child)?;
        }
        Ok(())
    }

    fn add_listener(&self, event: EventKind, mut listener: Listener<Self>) -> Result<(), DomError> {
        let target = self.clone();
        let closure = Closure::<dyn FnMut()>::new(move || listener(&target));
        self.0
            .add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())
            .map_err(|_| DomError::Listener(event.as_str().into()))?;
        // Handlers live as long as the page.
        closure.forget();
        Ok(())
    }
}

/// Wasm entry point: boots the bundled catalog with the default page layout.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let Some(doc) = WebDocument::current() else {
        return Ok(());
    };
    let catalog = Catalog::sample().map_err(|e| JsValue::from_str(&e.to_string()))?;
    page::boot(&doc, catalog, PageConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
