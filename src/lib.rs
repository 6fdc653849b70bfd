// Campus market catalog page: product cards and the mobile menu toggle.
pub mod catalog;
pub mod config;
pub mod dom;
pub mod menu;
pub mod model;
pub mod page;
pub mod render;

pub use catalog::Catalog;
pub use config::{load_config, load_config_or_default, PageConfig};
pub use model::{format_price, Category, Product};
pub use render::{render_products, RenderOptions};
