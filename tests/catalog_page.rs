//! End-to-end page scenarios against the in-memory document.

use campus_catalog::dom::{Document, Element, EventKind, MemoryDocument};
use campus_catalog::menu::ARIA_EXPANDED;
use campus_catalog::{format_price, page, render_products, Catalog, PageConfig, RenderOptions};
use scraper::{Html, Selector};

const SHELL: &str = include_str!("../static/index.html");

fn booted_page() -> MemoryDocument {
    let doc = MemoryDocument::parse(SHELL);
    page::boot(&doc, Catalog::sample().unwrap(), PageConfig::default()).unwrap();
    assert!(doc.fire_ready());
    doc
}

fn texts(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).unwrap();
    html.select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect()
}

#[test]
fn sample_catalog_renders_six_matching_cards() {
    let doc = booted_page();
    let catalog = Catalog::sample().unwrap();
    let html = Html::parse_document(&doc.to_html());

    let names = texts(&html, "#products-grid .product-card .product-name");
    let sellers = texts(&html, "#products-grid .product-card .product-seller");
    let prices = texts(&html, "#products-grid .product-card .product-price");
    assert_eq!(names.len(), 6);

    for (index, product) in catalog.products().iter().enumerate() {
        assert_eq!(names[index], product.name);
        assert_eq!(
            sellers[index],
            format!("{} — {}", product.seller, product.university)
        );
        assert_eq!(prices[index], format!("${}", format_price(product.price)));
    }
    assert_eq!(prices[0], "$15.50");
    assert_eq!(prices[1], "$25.00");
    assert_eq!(prices[4], "$100.00");
}

#[test]
fn cards_keep_catalog_order() {
    let doc = booted_page();
    let html = Html::parse_document(&doc.to_html());
    let selector = Selector::parse(".product-card").unwrap();
    let ids: Vec<&str> = html
        .select(&selector)
        .filter_map(|card| card.value().attr("data-product-id"))
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn prerendered_page_is_stable_across_rerenders() {
    let doc = booted_page();
    let first = doc.to_html();

    let grid = doc.element_by_id("products-grid").unwrap();
    let catalog = Catalog::sample().unwrap();
    render_products(&doc, &grid, catalog.products(), &RenderOptions::default()).unwrap();
    assert_eq!(doc.to_html(), first);
}

#[test]
fn ready_fires_only_once() {
    let doc = booted_page();
    assert!(!doc.fire_ready());
    let grid = doc.element_by_id("products-grid").unwrap();
    assert_eq!(grid.child_elements().len(), 6);
}

#[test]
fn menu_toggles_on_the_booted_page() {
    let doc = booted_page();
    let trigger = doc.element_by_id("menu-toggle").unwrap();
    let panel = doc.element_by_id("nav-menu").unwrap();

    trigger.dispatch(EventKind::Click);
    assert!(panel.has_class("active"));
    assert_eq!(trigger.attribute(ARIA_EXPANDED).as_deref(), Some("true"));

    trigger.dispatch(EventKind::Click);
    assert!(!panel.has_class("active"));
    assert_eq!(trigger.attribute(ARIA_EXPANDED).as_deref(), Some("false"));
}

#[test]
fn broken_card_image_falls_back_once() {
    let doc = booted_page();
    let grid = doc.element_by_id("products-grid").unwrap();
    let image = grid.descendants_with_class("product-image").remove(0);
    assert_eq!(image.attribute("src").as_deref(), Some("images/bracelet.jpg"));

    assert_eq!(image.dispatch(EventKind::Error), 1);
    assert_eq!(image.attribute("src").as_deref(), Some("images/placeholder.svg"));
    image.dispatch(EventKind::Error);
    image.dispatch(EventKind::Error);
    assert_eq!(image.attribute("src").as_deref(), Some("images/placeholder.svg"));
}

#[test]
fn custom_ids_from_config_are_used() {
    let doc = MemoryDocument::parse(
        r#"<html><body>
            <div id="shop"></div><a id="burger"></a><div id="drawer"></div>
        </body></html>"#,
    );
    let config = PageConfig {
        container_id: "shop".into(),
        menu_trigger_id: "burger".into(),
        menu_panel_id: "drawer".into(),
        menu_open_class: "open".into(),
        ..PageConfig::default()
    };
    let report = page::run_page(&doc, &Catalog::sample().unwrap(), &config);
    assert_eq!(report.cards_rendered, Some(6));

    doc.element_by_id("burger").unwrap().dispatch(EventKind::Click);
    assert!(doc.element_by_id("drawer").unwrap().has_class("open"));
}

#[test]
fn page_without_catalog_elements_is_left_alone() {
    let doc = MemoryDocument::parse("<html><head></head><body><p>Contact</p></body></html>");
    let before = doc.to_html();
    page::boot(&doc, Catalog::sample().unwrap(), PageConfig::default()).unwrap();
    doc.fire_ready();
    assert_eq!(doc.to_html(), before);
}
