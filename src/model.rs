// Core structs: Product, Category, error enums
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub seller: String,
    pub university: String,
    pub price: f64,
    pub image: String,
    pub category: Category,
    pub description: String,
}

impl Product {
    /// "seller — university" line shown under the product name.
    pub fn seller_line(&self) -> String {
        format!("{} — {}", self.seller, self.university)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Accessories,
    Clothing,
    Food,
    Services,
    Art,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Accessories,
        Category::Clothing,
        Category::Food,
        Category::Services,
        Category::Art,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Accessories => "accessories",
            Category::Clothing => "clothing",
            Category::Food => "food",
            Category::Services => "services",
            Category::Art => "art",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// Formats a price with exactly two decimal places, e.g. `15.5` -> `"15.50"`.
/// Halves round away from zero (`0.125` -> `"0.13"`) and zero never carries a sign.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round();
    // `+ 0.0` turns -0.0 into 0.0
    format!("{:.2}", cents / 100.0 + 0.0)
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id {0}")]
    DuplicateId(u32),
    #[error("product {id} has invalid price {price}")]
    InvalidPrice { id: u32, price: f64 },
    #[error("unknown category label `{0}`")]
    UnknownCategory(String),
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog read error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to create <{0}> element")]
    CreateElement(String),
    #[error("failed to set attribute `{name}`: {reason}")]
    Attribute { name: String, reason: String },
    #[error("failed to update class list with `{0}`")]
    ClassList(String),
    #[error("failed to attach node: {0}")]
    Attach(String),
    #[error("failed to register `{0}` listener")]
    Listener(String),
}
