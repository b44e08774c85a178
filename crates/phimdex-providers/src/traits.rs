use async_trait::async_trait;
use phimdex_models::{MediaType, StreamSource};

use crate::capabilities::ProviderCapabilities;
use crate::error::ProviderError;

/// One external content source, translated to the canonical stream shape.
///
/// Adapters hold no mutable cross-call state beyond configuration (base
/// URL, HTTP client). Network faults, non-2xx responses, and malformed
/// payloads are absorbed inside the adapter and surfaced as `Ok(None)`
/// with a logged warning — a single flaky provider must never fail an
/// aggregate request.
#[async_trait]
pub trait StreamProvider: Send + Sync + ProviderCapabilities {
    /// Stable provider name, used for registry lookup and labeling the
    /// returned sources.
    fn provider_name(&self) -> &str;

    /// Query the provider for a title by external catalog id.
    ///
    /// `Ok(None)` means the provider's catalog has no matching entry —
    /// the expected common case, not a failure.
    async fn fetch_streams(
        &self,
        external_id: &str,
        media_type: &MediaType,
    ) -> Result<Option<Vec<StreamSource>>, ProviderError>;

    // Capability detection helper (delegated to ProviderCapabilities)
    fn has_title_search(&self) -> bool {
        self.supports_title_search()
    }
}
