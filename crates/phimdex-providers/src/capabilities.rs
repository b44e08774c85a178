/// Capability traits for stream providers
///
/// Not every provider can do everything: some only resolve titles by
/// external catalog id, some can also search by title, one feeds the
/// movie catalog. These traits let an adapter declare what it supports
/// and let callers check for a capability through a safe interface
/// assertion instead of downcasting.
use async_trait::async_trait;
use phimdex_models::{MediaType, Movie, StreamSource};

use crate::error::ProviderError;

/// Registry pattern for accessing capabilities through trait object
/// references.
pub trait ProviderCapabilities: Send + Sync {
    /// Get a reference to the TitleSearch capability if supported
    fn as_title_search(&self) -> Option<&dyn TitleSearch>;

    /// Get a reference to the MovieCatalog capability if supported
    fn as_movie_catalog(&self) -> Option<&dyn MovieCatalog>;

    /// Check if this provider supports title-based search
    fn supports_title_search(&self) -> bool {
        self.as_title_search().is_some()
    }

    /// Check if this provider can feed the movie catalog
    fn supports_movie_catalog(&self) -> bool {
        self.as_movie_catalog().is_some()
    }
}

/// Fallback lookup for providers whose catalog cannot always be addressed
/// by external id.
///
/// A candidate is accepted only on an exact case-insensitive match of the
/// provider's own original-name field; loose matches are rejected so a
/// lookalike title never contaminates the result.
#[async_trait]
pub trait TitleSearch: Send + Sync {
    /// Search the provider by original-language title and, on an exact
    /// match, return the matched title's full stream sources.
    ///
    /// `Ok(None)` means no exact match — the common case, not an error.
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Option<Vec<StreamSource>>, ProviderError>;
}

/// Master-list feed: pages of recently updated titles used to seed and
/// refresh the movie cache.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch one page (1-based) of the provider's latest titles as
    /// candidate movie records.
    ///
    /// List payloads are shallow — no trailer, description, or runtime.
    /// Those arrive later via [`MovieCatalog::fetch_detail`] and must not
    /// be erased when a shallow record is merged over a detailed one.
    async fn fetch_latest(&self, page: u32) -> Result<Vec<Movie>, ProviderError>;

    /// Fetch one title's full record (trailer, description, runtime,
    /// genres) by external catalog id. `Ok(None)` when the catalog has no
    /// matching entry.
    async fn fetch_detail(
        &self,
        external_id: &str,
        media_type: &MediaType,
    ) -> Result<Option<Movie>, ProviderError>;
}
