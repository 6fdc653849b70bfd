use crate::model::{CatalogError, Product};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const SAMPLE_PRODUCTS: &str = include_str!("../data/products.json");

/// One listing as stored in JSON. The category stays a plain label until
/// it is checked against the known set.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: u32,
    name: String,
    seller: String,
    university: String,
    price: f64,
    image: String,
    category: String,
    description: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CatalogError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Product {
            category: record.category.parse()?,
            id: record.id,
            name: record.name,
            seller: record.seller,
            university: record.university,
            price: record.price,
            image: record.image,
            description: record.description,
        })
    }
}

/// Immutable, ordered set of products. Built once and handed to whoever renders it.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Validates ids and prices, keeping the input order.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    id: product.id,
                    price: product.price,
                });
            }
        }
        Ok(Self {
            products: products.into(),
        })
    }

    /// The six listings bundled with the page.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json(SAMPLE_PRODUCTS)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        let products = records
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(products)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        debug!("Loaded {} products from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
