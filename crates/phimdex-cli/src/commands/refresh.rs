use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use phimdex_config::{Config, PathManager};
use phimdex_core::{CatalogService, MovieStore};
use phimdex_providers::ProviderRegistry;

use crate::output::{self, OutputFormat};

pub async fn run_refresh(
    config: &Config,
    paths: &PathManager,
    pages: Option<u32>,
    enrich: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let registry = Arc::new(ProviderRegistry::from_config(config));
    let store = Arc::new(MovieStore::open(paths.movies_file())?);
    let service = CatalogService::new(registry, store.clone());

    let pages = pages.unwrap_or(config.catalog.refresh_pages);

    let spinner = if !quiet && format == OutputFormat::Human {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Refreshing {} catalog page(s)...", pages));
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    } else {
        None
    };

    let outcome = service.refresh(pages, enrich).await?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    output::print_refresh(&outcome, store.len().await, format);
    Ok(())
}
