use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Stream providers, one optional section per adapter.
///
/// The field order here is the registry order: provider results are
/// concatenated in this order for every aggregate call.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub kkphim: Option<ProviderConfig>,
    #[serde(default)]
    pub nguonc: Option<ProviderConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AggregationConfig {
    /// Upper bound for one provider's whole unit of work (id lookup plus
    /// title fallback) within an aggregate call. A provider that exceeds
    /// it is recorded as no-result.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Per-request timeout on each adapter's HTTP client.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Pages of the master list walked by a default `refresh` run.
    #[serde(default = "default_refresh_pages")]
    pub refresh_pages: u32,
}

fn default_provider_timeout_secs() -> u64 {
    8
}

fn default_request_timeout_secs() -> u64 {
    6
}

fn default_refresh_pages() -> u32 {
    3
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            refresh_pages: default_refresh_pages(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig {
                kkphim: Some(ProviderConfig {
                    enabled: true,
                    base_url: "https://phimapi.com".to_string(),
                }),
                nguonc: Some(ProviderConfig {
                    enabled: true,
                    base_url: "https://phim.nguonc.com".to_string(),
                }),
            },
            aggregation: AggregationConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Load the config, falling back to defaults when no file exists yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))
    }
}
