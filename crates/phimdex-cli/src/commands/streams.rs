use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;

use phimdex_config::{Config, PathManager};
use phimdex_core::{MovieResolver, MovieStore, ResolveError, StreamAggregator};
use phimdex_models::MediaType;
use phimdex_providers::ProviderRegistry;

use crate::output::{self, OutputFormat};

pub async fn run_streams(
    config: &Config,
    paths: &PathManager,
    id: &str,
    media_type: MediaType,
    title: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let registry = Arc::new(ProviderRegistry::from_config(config));
    let aggregator = StreamAggregator::new(
        registry,
        Duration::from_secs(config.aggregation.provider_timeout_secs),
    );

    // Prefer the canonical cached record: its external id and original
    // title drive the fan-out regardless of which identifier the caller
    // passed. An unknown id falls through to a raw fan-out.
    let store = Arc::new(MovieStore::open(paths.movies_file())?);
    let resolver = MovieResolver::new(store);
    let (external_id, media_type, fallback_title) = match resolver.resolve(id, None, None).await {
        Ok(movie) => {
            let external_id = movie.external_id.clone().unwrap_or_else(|| id.to_string());
            let fallback_title = title.or_else(|| movie.original_title.clone());
            (external_id, movie.media_type, fallback_title)
        }
        Err(ResolveError::NotFound { .. }) => (id.to_string(), media_type, title),
        Err(e) => return Err(e.into()),
    };

    let sources = aggregator
        .aggregate(&external_id, &media_type, fallback_title.as_deref())
        .await;

    output::print_sources(&sources, format);
    Ok(())
}
