use crate::model::ConfigError;
use crate::render::RenderOptions;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub container_id: String,
    pub menu_trigger_id: String,
    pub menu_panel_id: String,
    pub menu_open_class: String,
    pub fallback_image: String,
    pub currency_prefix: String,
    /// Falls back to the bundled sample catalog when unset.
    pub catalog_path: Option<PathBuf>,
    /// HTML shell the prerender binary fills in.
    pub shell_path: PathBuf,
    /// Stdout when unset.
    pub output_path: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            container_id: "products-grid".into(),
            menu_trigger_id: "menu-toggle".into(),
            menu_panel_id: "nav-menu".into(),
            menu_open_class: "active".into(),
            fallback_image: "images/placeholder.svg".into(),
            currency_prefix: "$".into(),
            catalog_path: None,
            shell_path: PathBuf::from("static/index.html"),
            output_path: None,
        }
    }
}

impl PageConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            fallback_image: self.fallback_image.clone(),
            currency_prefix: self.currency_prefix.clone(),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<PageConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<PageConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PageConfig::default()),
        Err(e) => Err(e.into()),
    }
}

fn parse_config(content: &str) -> Result<PageConfig, ConfigError> {
    let config: PageConfig = serde_json::from_str(content)?;
    Ok(config)
}
