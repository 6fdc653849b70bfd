// Prerenders the catalog page into static HTML using the in-memory DOM.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    prerender::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod prerender {
    use campus_catalog::dom::MemoryDocument;
    use campus_catalog::{load_config_or_default, page, Catalog};
    use std::fs;
    use std::process::ExitCode;
    use tracing::{error, info};
    use tracing_subscriber::EnvFilter;

    const CONFIG_PATH: &str = "config.json";

    pub fn run() -> ExitCode {
        // Initialize logging
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .init();

        let config = match load_config_or_default(CONFIG_PATH) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path),
            None => Catalog::sample(),
        };
        let catalog = match catalog {
            Ok(c) => c,
            Err(e) => {
                error!("Catalog load error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        info!("Catalog has {} products", catalog.len());

        let shell = match fs::read_to_string(&config.shell_path) {
            Ok(html) => html,
            Err(e) => {
                error!("Failed to read shell {}: {}", config.shell_path.display(), e);
                return ExitCode::FAILURE;
            }
        };

        let doc = MemoryDocument::parse(&shell);
        let output_path = config.output_path.clone();
        if let Err(e) = page::boot(&doc, catalog, config) {
            error!("Page boot failed: {}", e);
            return ExitCode::FAILURE;
        }
        doc.fire_ready();
        let html = doc.to_html();

        match output_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    if let Err(e) = fs::create_dir_all(parent) {
                        error!("Failed to create {}: {}", parent.display(), e);
                        return ExitCode::FAILURE;
                    }
                }
                if let Err(e) = fs::write(&path, html) {
                    error!("Failed to write {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
                info!("Wrote {}", path.display());
            }
            None => print!("{}", html),
        }
        ExitCode::SUCCESS
    }
}
