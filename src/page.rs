// Page bootstrap: wires the renderer and the menu to the document once it is ready.
use crate::catalog::Catalog;
use crate::config::PageConfig;
use crate::dom::Document;
use crate::menu::{MenuController, MenuState};
use crate::model::DomError;
use crate::render::render_products;
use tracing::{debug, info, warn};

/// What the ready handler managed to set up. `None` means the feature was not
/// applicable to this page or failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    pub cards_rendered: Option<usize>,
    pub menu: Option<MenuState>,
}

/// Registers the ready handler. Nothing touches the document until it fires.
pub fn boot<D>(doc: &D, catalog: Catalog, config: PageConfig) -> Result<(), DomError>
where
    D: Document + Clone + 'static,
{
    let target = doc.clone();
    doc.on_ready(Box::new(move || {
        let report = run_page(&target, &catalog, &config);
        info!(
            "Page ready: {} cards, menu {}",
            report.cards_rendered.unwrap_or(0),
            if report.menu.is_some() { "wired" } else { "absent" }
        );
    }))
}

/// The ready handler body. Missing elements are skipped, not reported as errors.
pub fn run_page<D: Document>(doc: &D, catalog: &Catalog, config: &PageConfig) -> PageReport {
    PageReport {
        cards_rendered: render_catalog(doc, catalog, config),
        menu: wire_menu(doc, config),
    }
}

fn render_catalog<D: Document>(doc: &D, catalog: &Catalog, config: &PageConfig) -> Option<usize> {
    let Some(container) = doc.element_by_id(&config.container_id) else {
        debug!("No #{} on this page, skipping products", config.container_id);
        return None;
    };
    match render_products(doc, &container, catalog.products(), &config.render_options()) {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Rendering products failed: {}", e);
            None
        }
    }
}

fn wire_menu<D: Document>(doc: &D, config: &PageConfig) -> Option<MenuState> {
    let trigger = doc.element_by_id(&config.menu_trigger_id);
    let panel = doc.element_by_id(&config.menu_panel_id);
    let (Some(trigger), Some(panel)) = (trigger, panel) else {
        debug!("Menu trigger or panel missing, skipping menu");
        return None;
    };
    match MenuController::wire(trigger, panel, &config.menu_open_class) {
        Ok(controller) => Some(controller.state()),
        Err(e) => {
            warn!("Wiring menu failed: {}", e);
            None
        }
    }
}
