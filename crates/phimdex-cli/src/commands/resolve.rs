use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;

use phimdex_config::PathManager;
use phimdex_core::{MovieResolver, MovieStore, ResolveError};
use phimdex_models::{MediaType, MovieSeed};

use crate::output::{self, OutputFormat};

pub async fn run_resolve(
    paths: &PathManager,
    id: &str,
    external_id: Option<String>,
    title: Option<String>,
    media_type: Option<MediaType>,
    format: OutputFormat,
) -> Result<()> {
    let store = Arc::new(MovieStore::open(paths.movies_file())?);
    let resolver = MovieResolver::new(store.clone());

    let seed = title.map(|title| {
        let mut seed = MovieSeed::new(title);
        seed.media_type = media_type;
        seed
    });

    match resolver.resolve(id, external_id.as_deref(), seed).await {
        Ok(movie) => {
            store.save_if_dirty().await?;
            output::print_movie(&movie, format);
            Ok(())
        }
        Err(ResolveError::NotFound { .. }) => Err(eyre!(
            "Movie '{}' is not cached. Pass --title (and optionally --media-type) to create it.",
            id
        )),
        Err(e) => Err(e.into()),
    }
}
