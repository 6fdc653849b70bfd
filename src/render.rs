use crate::dom::{Document, Element, EventKind};
use crate::model::{format_price, DomError, Product};
use tracing::debug;

pub const CARD_CLASS: &str = "product-card";
pub const VIEW_ITEM_LABEL: &str = "View Item";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Substituted once when a product image fails to load.
    pub fallback_image: String,
    pub currency_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fallback_image: "images/placeholder.svg".into(),
            currency_prefix: "$".into(),
        }
    }
}

/// Replaces the container's content with one card per product, in input order.
/// Returns the number of cards written.
pub fn render_products<D: Document>(
    doc: &D,
    container: &D::Element,
    products: &[Product],
    options: &RenderOptions,
) -> Result<usize, DomError> {
    let cards = products
        .iter()
        .map(|product| build_card(doc, product, options))
        .collect::<Result<Vec<_>, _>>()?;
    container.replace_children(&cards)?;
    debug!("Rendered {} product cards", cards.len());
    Ok(cards.len())
}

fn build_card<D: Document>(
    doc: &D,
    product: &Product,
    options: &RenderOptions,
) -> Result<D::Element, DomError> {
    let card = doc.create_element("div")?;
    card.set_class_name(CARD_CLASS);
    card.set_attribute("data-product-id", &product.id.to_string())?;
    card.set_attribute("data-category", product.category.label())?;

    let image = doc.create_element("img")?;
    image.set_class_name("product-image");
    image.set_attribute("src", &product.image)?;
    image.set_attribute("alt", &product.name)?;
    install_image_fallback(&image, &options.fallback_image)?;

    let info = doc.create_element("div")?;
    info.set_class_name("product-info");

    let name = text_element(doc, "h3", "product-name", &product.name)?;
    let seller = text_element(doc, "p", "product-seller", &product.seller_line())?;
    let price = text_element(
        doc,
        "p",
        "product-price",
        &format!("{}{}", options.currency_prefix, format_price(product.price)),
    )?;

    // Inert for now: no click handler is attached.
    let view = text_element(doc, "button", "btn-view", VIEW_ITEM_LABEL)?;
    view.set_attribute("type", "button")?;

    info.replace_children(&[name, seller, price, view])?;
    card.replace_children(&[image, info])?;
    Ok(card)
}

fn text_element<D: Document>(
    doc: &D,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<D::Element, DomError> {
    let element = doc.create_element(tag)?;
    element.set_class_name(class);
    element.set_text(text);
    Ok(element)
}

/// Swaps `src` to `fallback` on the first load error only, so an unreachable
/// fallback cannot trigger another substitution.
pub fn install_image_fallback<E: Element>(image: &E, fallback: &str) -> Result<(), DomError> {
    let fallback = fallback.to_string();
    let mut substituted = false;
    image.add_listener(
        EventKind::Error,
        Box::new(move |image: &E| {
            if substituted {
                return;
            }
            substituted = true;
            let _ = image.set_attribute("src", &fallback);
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, MemoryElement};
    use crate::model::Category;

    fn product(id: u32, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.into(),
            seller: "Maya Chen".into(),
            university: "State University".into(),
            price,
            image: format!("images/{id}.jpg"),
            category: Category::Accessories,
            description: String::new(),
        }
    }

    fn container(doc: &MemoryDocument) -> MemoryElement {
        let body = doc.body().unwrap();
        let grid = doc.create_element("div").unwrap();
        grid.set_attribute("id", "products-grid").unwrap();
        body.append_child(&grid).unwrap();
        grid
    }

    #[test]
    fn card_contains_image_name_seller_price_and_button() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        let count = render_products(
            &doc,
            &grid,
            &[product(3, "Beaded Bracelet", 15.5)],
            &RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(count, 1);

        let card = &grid.child_elements()[0];
        assert!(card.has_class(CARD_CLASS));
        assert_eq!(card.attribute("data-product-id").as_deref(), Some("3"));
        assert_eq!(card.attribute("data-category").as_deref(), Some("accessories"));

        let image = &card.descendants_with_class("product-image")[0];
        assert_eq!(image.tag(), "img");
        assert_eq!(image.attribute("src").as_deref(), Some("images/3.jpg"));
        assert_eq!(image.attribute("alt").as_deref(), Some("Beaded Bracelet"));

        let text_of = |class: &str| card.descendants_with_class(class)[0].text();
        assert_eq!(text_of("product-name"), "Beaded Bracelet");
        assert_eq!(text_of("product-seller"), "Maya Chen — State University");
        assert_eq!(text_of("product-price"), "$15.50");
        assert_eq!(text_of("btn-view"), VIEW_ITEM_LABEL);

        let button = &card.descendants_with_class("btn-view")[0];
        assert_eq!(button.listener_count(EventKind::Click), 0);
    }

    #[test]
    fn currency_prefix_comes_from_options() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        let options = RenderOptions {
            currency_prefix: "€".into(),
            ..RenderOptions::default()
        };
        render_products(&doc, &grid, &[product(1, "Hoodie", 25.0)], &options).unwrap();
        assert_eq!(grid.descendants_with_class("product-price")[0].text(), "€25.00");
    }

    #[test]
    fn zero_prices_render_unsigned() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        let products = [product(1, "Free", 0.0), product(2, "Also free", -0.0)];
        render_products(&doc, &grid, &products, &RenderOptions::default()).unwrap();

        for price in grid.descendants_with_class("product-price") {
            assert_eq!(price.text(), "$0.00");
        }
        assert!(!grid.inner_html().contains("-0.00"));
    }

    #[test]
    fn renders_in_input_order_and_replaces_previous_content() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        grid.set_text("Loading products...");

        let products = [product(9, "C", 1.0), product(2, "A", 2.0), product(5, "B", 3.0)];
        render_products(&doc, &grid, &products, &RenderOptions::default()).unwrap();

        let ids: Vec<String> = grid
            .child_elements()
            .iter()
            .filter_map(|card| card.attribute("data-product-id"))
            .collect();
        assert_eq!(ids, vec!["9", "2", "5"]);
        assert!(!grid.text().contains("Loading"));
    }

    #[test]
    fn rerendering_is_idempotent() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        let products = [product(1, "A", 100.0), product(2, "B", 25.0)];

        render_products(&doc, &grid, &products, &RenderOptions::default()).unwrap();
        let first = grid.inner_html();
        render_products(&doc, &grid, &products, &RenderOptions::default()).unwrap();
        assert_eq!(grid.inner_html(), first);
        assert_eq!(grid.child_elements().len(), 2);
    }

    #[test]
    fn empty_input_leaves_container_empty() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        render_products(&doc, &grid, &[product(1, "A", 1.0)], &RenderOptions::default()).unwrap();

        assert_eq!(render_products(&doc, &grid, &[], &RenderOptions::default()).unwrap(), 0);
        assert!(grid.child_elements().is_empty());
        assert_eq!(grid.inner_html(), "");
    }

    #[test]
    fn broken_image_is_substituted_exactly_once() {
        let doc = MemoryDocument::new();
        let image = doc.create_element("img").unwrap();
        image.set_attribute("src", "images/missing.jpg").unwrap();
        install_image_fallback(&image, "images/placeholder.svg").unwrap();

        image.dispatch(EventKind::Error);
        assert_eq!(image.attribute("src").as_deref(), Some("images/placeholder.svg"));

        // The fallback failing too must not start a substitution loop.
        image.set_attribute("src", "images/also-missing.svg").unwrap();
        image.dispatch(EventKind::Error);
        assert_eq!(image.attribute("src").as_deref(), Some("images/also-missing.svg"));
    }

    #[test]
    fn untrusted_text_is_not_interpreted_as_markup() {
        let doc = MemoryDocument::new();
        let grid = container(&doc);
        render_products(
            &doc,
            &grid,
            &[product(1, "<img src=x onerror=alert(1)>", 1.0)],
            &RenderOptions::default(),
        )
        .unwrap();

        let card = &grid.child_elements()[0];
        assert_eq!(card.descendants_with_class("product-name")[0].child_elements().len(), 0);
        assert!(grid.inner_html().contains("&lt;img src=x onerror=alert(1)&gt;"));
    }
}
