use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use phimdex_models::{MediaType, StreamSource};
use phimdex_providers::{ProviderCapabilities, ProviderRegistry, StreamProvider};

/// Fans one stream request out to every registered provider and merges
/// whatever came back.
///
/// Providers are independent, slow, and individually unreliable, so the
/// aggregator maximizes availability over consistency: each provider gets
/// its own concurrent unit of work, a failing or timed-out provider is
/// simply absent from the response, and the call settles only when every
/// unit has. No retries — the next user request tries the provider fresh.
pub struct StreamAggregator {
    registry: Arc<ProviderRegistry>,
    provider_timeout: Duration,
}

impl StreamAggregator {
    pub fn new(registry: Arc<ProviderRegistry>, provider_timeout: Duration) -> Self {
        Self {
            registry,
            provider_timeout,
        }
    }

    /// Collect stream sources for one title from every provider.
    ///
    /// Results are concatenated in registry order (within a provider, in
    /// the order the adapter returned them). An empty list is a valid
    /// outcome meaning no provider currently has the title.
    pub async fn aggregate(
        &self,
        external_id: &str,
        media_type: &MediaType,
        fallback_title: Option<&str>,
    ) -> Vec<StreamSource> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            debug!(
                "No providers registered; returning empty aggregation for id {}",
                external_id
            );
            return Vec::new();
        }

        let timeout = self.provider_timeout;
        let units = providers.iter().map(|provider| {
            let provider = provider.clone();
            async move {
                match tokio::time::timeout(
                    timeout,
                    query_provider(provider.as_ref(), external_id, media_type, fallback_title),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            "Provider '{}' timed out after {:?} for id {}; recording no result",
                            provider.provider_name(),
                            timeout,
                            external_id
                        );
                        None
                    }
                }
            }
        });

        // join_all keeps input order, which is the registry order.
        let results = join_all(units).await;

        let answered = results.iter().filter(|result| result.is_some()).count();
        debug!(
            "Aggregation for id {} settled: {}/{} provider(s) returned sources",
            external_id,
            answered,
            providers.len()
        );

        results.into_iter().flatten().flatten().collect()
    }
}

/// One provider's unit of work: id lookup, then title fallback when the
/// lookup came back empty and the provider can search.
async fn query_provider(
    provider: &dyn StreamProvider,
    external_id: &str,
    media_type: &MediaType,
    fallback_title: Option<&str>,
) -> Option<Vec<StreamSource>> {
    let name = provider.provider_name();

    match provider.fetch_streams(external_id, media_type).await {
        Ok(Some(sources)) => {
            debug!(
                "Provider '{}' returned {} source(s) for id {}",
                name,
                sources.len(),
                external_id
            );
            return Some(sources);
        }
        Ok(None) => {}
        Err(e) => {
            // Caught here so one failing provider cannot cancel or fail
            // its siblings.
            warn!("Provider '{}' failed for id {}: {}", name, external_id, e);
            return None;
        }
    }

    let title = fallback_title?;
    let search = provider.as_title_search()?;
    debug!(
        "Provider '{}' has no entry for id {}; trying title fallback '{}'",
        name, external_id, title
    );
    match search.search_by_title(title).await {
        Ok(result) => result,
        Err(e) => {
            warn!(
                "Provider '{}' title fallback for '{}' failed: {}",
                name, title, e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use phimdex_models::StreamLanguage;
    use phimdex_providers::capabilities::{MovieCatalog, ProviderCapabilities, TitleSearch};
    use phimdex_providers::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn source(provider: &str, server: &str) -> StreamSource {
        StreamSource {
            provider: provider.to_string(),
            server_name: server.to_string(),
            quality: "HD".to_string(),
            language: StreamLanguage::Unknown,
            episodes: Vec::new(),
        }
    }

    struct MockProvider {
        name: &'static str,
        streams: Option<Vec<StreamSource>>,
        fail: bool,
        delay: Option<Duration>,
        searchable: bool,
        search_result: Option<Vec<StreamSource>>,
        search_calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        fn new(name: &'static str, streams: Option<Vec<StreamSource>>) -> Self {
            Self {
                name,
                streams,
                fail: false,
                delay: None,
                searchable: false,
                search_result: None,
                search_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn with_search(mut self, result: Option<Vec<StreamSource>>) -> Self {
            self.searchable = true;
            self.search_result = result;
            self
        }
    }

    #[async_trait]
    impl StreamProvider for MockProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        async fn fetch_streams(
            &self,
            _external_id: &str,
            _media_type: &MediaType,
        ) -> Result<Option<Vec<StreamSource>>, ProviderError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ProviderError::Payload {
                    url: format!("https://{}.test", self.name),
                    reason: "HTTP 500".to_string(),
                });
            }
            Ok(self.streams.clone())
        }
    }

    #[async_trait]
    impl TitleSearch for MockProvider {
        async fn search_by_title(
            &self,
            _title: &str,
        ) -> Result<Option<Vec<StreamSource>>, ProviderError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.search_result.clone())
        }
    }

    impl ProviderCapabilities for MockProvider {
        fn as_title_search(&self) -> Option<&dyn TitleSearch> {
            if self.searchable {
                Some(self)
            } else {
                None
            }
        }

        fn as_movie_catalog(&self) -> Option<&dyn MovieCatalog> {
            None
        }
    }

    fn aggregator(providers: Vec<MockProvider>) -> StreamAggregator {
        let providers = providers
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn StreamProvider>)
            .collect();
        StreamAggregator::new(
            Arc::new(ProviderRegistry::new(providers)),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_union_of_survivors_in_registry_order() {
        let a = MockProvider::new("a", Some(vec![source("a", "s1"), source("a", "s2")]));
        let b = MockProvider::new("b", None).failing();
        let c = MockProvider::new("c", Some(vec![source("c", "s3")]));

        let sources = aggregator(vec![a, b, c])
            .aggregate("100", &MediaType::Movie, None)
            .await;

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].provider, "a");
        assert_eq!(sources[1].provider, "a");
        assert_eq!(sources[2].provider, "c");
    }

    #[tokio::test]
    async fn test_title_fallback_fills_in_for_absent_id() {
        // Scenario: A resolves the id directly, B only knows the title.
        let a = MockProvider::new("a", Some(vec![source("a", "s1"), source("a", "s2")]));
        let b = MockProvider::new("b", None).with_search(Some(vec![source("b", "s3")]));
        let search_calls = b.search_calls.clone();

        let sources = aggregator(vec![a, b])
            .aggregate("100", &MediaType::Movie, Some("Dune"))
            .await;

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].provider, "a");
        assert_eq!(sources[1].provider, "a");
        assert_eq!(sources[2].provider, "b");
        assert_eq!(search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_fallback_without_title() {
        let b = MockProvider::new("b", None).with_search(Some(vec![source("b", "s1")]));
        let search_calls = b.search_calls.clone();

        let sources = aggregator(vec![b])
            .aggregate("100", &MediaType::Movie, None)
            .await;

        assert!(sources.is_empty());
        assert_eq!(search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_fallback_without_capability() {
        let b = MockProvider::new("b", None);
        let search_calls = b.search_calls.clone();

        let sources = aggregator(vec![b])
            .aggregate("100", &MediaType::Movie, Some("Dune"))
            .await;

        assert!(sources.is_empty());
        assert_eq!(search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_error_skips_fallback() {
        // The whole unit of work is abandoned on a provider error; the
        // fallback belongs to the absent-result path only.
        let b = MockProvider::new("b", None)
            .failing()
            .with_search(Some(vec![source("b", "s1")]));
        let search_calls = b.search_calls.clone();

        let sources = aggregator(vec![b])
            .aggregate("100", &MediaType::Movie, Some("Dune"))
            .await;

        assert!(sources.is_empty());
        assert_eq!(search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_slow_provider_still_lands_in_registry_order() {
        let a = MockProvider::new("a", Some(vec![source("a", "s1")]))
            .delayed(Duration::from_millis(40));
        let b = MockProvider::new("b", Some(vec![source("b", "s2")]));

        let sources = aggregator(vec![a, b])
            .aggregate("100", &MediaType::Tv, None)
            .await;

        assert_eq!(sources[0].provider, "a");
        assert_eq!(sources[1].provider, "b");
    }

    #[tokio::test]
    async fn test_timed_out_provider_is_recorded_as_no_result() {
        let a = MockProvider::new("a", Some(vec![source("a", "s1")]))
            .delayed(Duration::from_millis(500));
        let b = MockProvider::new("b", Some(vec![source("b", "s2")]));

        let providers = vec![
            Arc::new(a) as Arc<dyn StreamProvider>,
            Arc::new(b) as Arc<dyn StreamProvider>,
        ];
        let aggregator = StreamAggregator::new(
            Arc::new(ProviderRegistry::new(providers)),
            Duration::from_millis(50),
        );

        let sources = aggregator.aggregate("100", &MediaType::Movie, None).await;
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].provider, "b");
    }

    #[tokio::test]
    async fn test_empty_registry_yields_empty_result() {
        let aggregator = StreamAggregator::new(
            Arc::new(ProviderRegistry::new(Vec::new())),
            Duration::from_secs(2),
        );
        let sources = aggregator.aggregate("100", &MediaType::Movie, Some("Dune")).await;
        assert!(sources.is_empty());
    }
}
