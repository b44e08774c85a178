use std::sync::Arc;
use tracing::debug;

use phimdex_models::{MediaType, Movie, MovieSeed};

use crate::error::ResolveError;
use crate::store::MovieStore;

/// Provider name stamped on records created from caller-supplied data
/// when the seed does not name one.
const DEFAULT_SEED_PROVIDER: &str = "tmdb";

/// Turns a loosely-specified movie reference into the canonical stored
/// record.
///
/// Clients address movies by whatever identifier they have — the internal
/// id, the external catalog id, or one opaque value that could be either.
/// The lookup order below is a correctness-critical invariant: a favorite
/// added by external id and one added by internal id must land on the
/// same canonical record.
pub struct MovieResolver {
    store: Arc<MovieStore>,
}

impl MovieResolver {
    pub fn new(store: Arc<MovieStore>) -> Self {
        Self { store }
    }

    /// Resolve a reference, creating a record from `fallback` when
    /// nothing matches.
    ///
    /// Lookup order: `candidate_id` as internal primary key, then the
    /// explicit `candidate_external_id`, then `candidate_id` reinterpreted
    /// as an external id (callers that only know the provider's id pass it
    /// as the primary parameter). Only after all three miss is `fallback`
    /// consulted.
    pub async fn resolve(
        &self,
        candidate_id: &str,
        candidate_external_id: Option<&str>,
        fallback: Option<MovieSeed>,
    ) -> Result<Movie, ResolveError> {
        if let Some(movie) = self.store.get(candidate_id).await {
            return Ok(movie);
        }

        if let Some(external_id) = candidate_external_id {
            if let Some(movie) = self.store.get_by_external_id(external_id).await {
                return Ok(movie);
            }
        }

        if let Some(movie) = self.store.get_by_external_id(candidate_id).await {
            return Ok(movie);
        }

        if let Some(seed) = fallback {
            let external_id = candidate_external_id.unwrap_or(candidate_id);
            debug!(
                "No cached record for '{}'; creating from supplied data under external id '{}'",
                candidate_id, external_id
            );
            let movie = movie_from_seed(seed, external_id);
            return Ok(self.store.merge_save(movie).await);
        }

        Err(ResolveError::NotFound {
            candidate_id: candidate_id.to_string(),
        })
    }
}

fn movie_from_seed(seed: MovieSeed, external_id: &str) -> Movie {
    let media_type = seed.media_type.unwrap_or(MediaType::Movie);
    let mut movie = Movie::new(seed.title, media_type).with_external_id(external_id);
    movie.original_title = seed.original_title;
    movie.description = seed.description;
    movie.poster_url = seed.poster_url;
    movie.backdrop_url = seed.backdrop_url;
    movie.trailer_url = seed.trailer_url;
    movie.release_date = seed.release_date;
    movie.duration = seed.duration;
    movie.rating = seed.rating;
    movie.genres = seed.genres;
    movie.imdb_id = seed.imdb_id;
    movie.original_language = seed.original_language;
    movie.provider = seed
        .provider
        .or_else(|| Some(DEFAULT_SEED_PROVIDER.to_string()));
    movie.stream_url = seed.stream_url;
    movie
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(movies: Vec<Movie>) -> Arc<MovieStore> {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MovieStore::open(dir.path().join("movies.json")).unwrap());
        for movie in movies {
            store.merge_save(movie).await;
        }
        store
    }

    #[tokio::test]
    async fn test_resolves_by_internal_id_first() {
        let movie = Movie::new("Dune", MediaType::Movie).with_external_id("42");
        let store = store_with(vec![movie.clone()]).await;
        let resolver = MovieResolver::new(store);

        let resolved = resolver.resolve(&movie.id, None, None).await.unwrap();
        assert_eq!(resolved.id, movie.id);
    }

    #[tokio::test]
    async fn test_resolves_by_explicit_external_id() {
        let movie = Movie::new("Dune", MediaType::Movie).with_external_id("42");
        let store = store_with(vec![movie.clone()]).await;
        let resolver = MovieResolver::new(store);

        let resolved = resolver
            .resolve("not-a-known-id", Some("42"), None)
            .await
            .unwrap();
        assert_eq!(resolved.id, movie.id);
    }

    #[tokio::test]
    async fn test_candidate_id_reinterpreted_as_external_id() {
        // Record exists only under external id "42"; a caller passing
        // "42" as the primary parameter must reach it, not a duplicate.
        let movie = Movie::new("Dune", MediaType::Movie).with_external_id("42");
        let store = store_with(vec![movie.clone()]).await;
        let resolver = MovieResolver::new(store.clone());

        let resolved = resolver.resolve("42", None, None).await.unwrap();
        assert_eq!(resolved.id, movie.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_creates_from_seed_with_defaults() {
        let store = store_with(Vec::new()).await;
        let resolver = MovieResolver::new(store.clone());

        let created = resolver
            .resolve("99", None, Some(MovieSeed::new("Dune")))
            .await
            .unwrap();

        assert_eq!(created.external_id.as_deref(), Some("99"));
        assert_eq!(created.media_type, MediaType::Movie);
        assert_eq!(created.provider.as_deref(), Some("tmdb"));
        assert_eq!(store.len().await, 1);

        // Resolving again by the same reference returns the created
        // record instead of a second one.
        let again = resolver.resolve("99", None, None).await.unwrap();
        assert_eq!(again.id, created.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_explicit_external_id_wins_for_creation() {
        let store = store_with(Vec::new()).await;
        let resolver = MovieResolver::new(store);

        let mut seed = MovieSeed::new("Dune");
        seed.media_type = Some(MediaType::Tv);
        seed.provider = Some("kkphim".to_string());

        let created = resolver
            .resolve("opaque-client-key", Some("438631"), Some(seed))
            .await
            .unwrap();

        assert_eq!(created.external_id.as_deref(), Some("438631"));
        assert_eq!(created.media_type, MediaType::Tv);
        assert_eq!(created.provider.as_deref(), Some("kkphim"));
    }

    #[tokio::test]
    async fn test_not_found_is_distinguishable() {
        let store = store_with(Vec::new()).await;
        let resolver = MovieResolver::new(store);

        let err = resolver.resolve("missing", None, None).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }
}
