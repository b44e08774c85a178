use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use phimdex_config::Config;

use crate::capabilities::ProviderCapabilities;
use crate::kkphim::KkphimClient;
use crate::nguonc::NguoncClient;
use crate::traits::StreamProvider;

/// The live set of provider adapters, assembled once at process wiring
/// time and immutable afterwards.
///
/// Iteration order is the configuration order and stays stable for the
/// process lifetime; aggregate results are concatenated in this order.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn StreamProvider>>,
}

impl ProviderRegistry {
    /// Composition-root constructor for an explicit adapter list (used
    /// directly by tests and embedders).
    pub fn new(providers: Vec<Arc<dyn StreamProvider>>) -> Self {
        Self { providers }
    }

    /// Instantiate every enabled adapter from configuration. An adapter
    /// that fails to construct is skipped with a warning; an empty
    /// registry is valid and makes aggregation return zero results.
    pub fn from_config(config: &Config) -> Self {
        let request_timeout = Duration::from_secs(config.aggregation.request_timeout_secs);
        let mut providers: Vec<Arc<dyn StreamProvider>> = Vec::new();

        if let Some(kkphim) = config.providers.kkphim.as_ref().filter(|c| c.enabled) {
            match KkphimClient::new(&kkphim.base_url, request_timeout) {
                Ok(client) => providers.push(Arc::new(client)),
                Err(e) => warn!("Skipping provider 'kkphim': {}", e),
            }
        }

        if let Some(nguonc) = config.providers.nguonc.as_ref().filter(|c| c.enabled) {
            match NguoncClient::new(&nguonc.base_url, request_timeout) {
                Ok(client) => providers.push(Arc::new(client)),
                Err(e) => warn!("Skipping provider 'nguonc': {}", e),
            }
        }

        if providers.is_empty() {
            warn!("No stream providers configured; aggregation will return no results");
        } else {
            debug!(
                "Registered {} stream provider(s): {:?}",
                providers.len(),
                providers.iter().map(|p| p.provider_name()).collect::<Vec<_>>()
            );
        }

        Self { providers }
    }

    pub fn providers(&self) -> &[Arc<dyn StreamProvider>] {
        &self.providers
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<dyn StreamProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.provider_name() == name)
            .cloned()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// The master-list provider feeding the movie cache: first registered
    /// adapter with the catalog capability.
    pub fn movie_catalog(&self) -> Option<&Arc<dyn StreamProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.supports_movie_catalog())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phimdex_config::{ProviderConfig, ProvidersConfig};

    fn config(kkphim_enabled: bool, nguonc_enabled: bool) -> Config {
        let mut config = Config::default();
        config.providers = ProvidersConfig {
            kkphim: Some(ProviderConfig {
                enabled: kkphim_enabled,
                base_url: "https://phimapi.test".to_string(),
            }),
            nguonc: Some(ProviderConfig {
                enabled: nguonc_enabled,
                base_url: "https://phim.nguonc.test".to_string(),
            }),
        };
        config
    }

    #[test]
    fn test_registry_preserves_configuration_order() {
        let registry = ProviderRegistry::from_config(&config(true, true));
        assert_eq!(registry.provider_names(), vec!["kkphim", "nguonc"]);
    }

    #[test]
    fn test_disabled_providers_are_not_registered() {
        let registry = ProviderRegistry::from_config(&config(false, true));
        assert_eq!(registry.provider_names(), vec!["nguonc"]);
    }

    #[test]
    fn test_empty_registry_is_valid() {
        let registry = ProviderRegistry::from_config(&config(false, false));
        assert!(registry.is_empty());
        assert!(registry.by_name("kkphim").is_none());
    }

    #[test]
    fn test_catalog_provider_is_kkphim() {
        let registry = ProviderRegistry::from_config(&config(true, true));
        let catalog = registry.movie_catalog().unwrap();
        assert_eq!(catalog.provider_name(), "kkphim");

        // nguonc alone cannot feed the catalog.
        let registry = ProviderRegistry::from_config(&config(false, true));
        assert!(registry.movie_catalog().is_none());
    }
}
