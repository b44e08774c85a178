use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use phimdex_models::{MediaType, StreamLanguage, StreamSource};

use crate::capabilities::{MovieCatalog, ProviderCapabilities, TitleSearch};
use crate::error::ProviderError;
use crate::mapping::build_episode;
use crate::nguonc::api;
use crate::traits::StreamProvider;

pub(crate) const PROVIDER_NAME: &str = "nguonc";

/// Adapter for the NguonC-style catalog (phim.nguonc.com shape).
///
/// Lookup is by the upstream's own film id only; the upstream has no
/// reliable original-name search, so this adapter deliberately does not
/// offer the title-search capability.
pub struct NguoncClient {
    client: Client,
    base_url: String,
}

impl NguoncClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::Init {
                name: PROVIDER_NAME.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_film(&self, response: api::NcFilmResponse) -> Option<Vec<StreamSource>> {
        if response.status.as_deref() != Some("success") {
            return None;
        }
        let movie = response.movie?;
        debug!(
            "nguonc: '{}' ({}) carries {} server(s)",
            movie.name,
            movie.slug,
            movie.episodes.len()
        );
        let quality = movie.quality.clone().unwrap_or_default();

        let sources = movie
            .episodes
            .iter()
            .map(|server| StreamSource {
                provider: PROVIDER_NAME.to_string(),
                server_name: server.server_name.clone(),
                quality: quality.clone(),
                language: StreamLanguage::classify(&server.server_name),
                episodes: server
                    .items
                    .iter()
                    .enumerate()
                    .map(|(index, ep)| {
                        build_episode(
                            &ep.name,
                            &ep.slug,
                            ep.m3u8.as_deref(),
                            ep.embed.as_deref(),
                            index,
                        )
                    })
                    .collect(),
            })
            .collect();
        Some(sources)
    }
}

#[async_trait]
impl StreamProvider for NguoncClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_streams(
        &self,
        external_id: &str,
        _media_type: &MediaType,
    ) -> Result<Option<Vec<StreamSource>>, ProviderError> {
        // One endpoint shape covers films and series here.
        match api::get_film(&self.client, &self.base_url, external_id).await {
            Ok(response) => Ok(self.map_film(response)),
            Err(e) => {
                warn!("nguonc: lookup by id {} failed: {}", external_id, e);
                Ok(None)
            }
        }
    }
}

impl ProviderCapabilities for NguoncClient {
    fn as_title_search(&self) -> Option<&dyn TitleSearch> {
        None
    }

    fn as_movie_catalog(&self) -> Option<&dyn MovieCatalog> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StreamProvider;

    const FILM_JSON: &str = r#"{
        "status": "success",
        "movie": {
            "name": "Tây Du Ký",
            "slug": "tay-du-ky",
            "quality": "HD",
            "episodes": [
                {
                    "server_name": "Thuyết Minh #1",
                    "items": [
                        {"name": "Tập 01", "slug": "tap-01", "embed": "https://e/1", "m3u8": "https://m/1.m3u8"},
                        {"name": "Tập 02", "slug": "tap-02", "embed": "https://e/2", "m3u8": ""}
                    ]
                }
            ]
        }
    }"#;

    fn client() -> NguoncClient {
        NguoncClient::new("https://phim.nguonc.test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_map_film_classifies_server_language() {
        let response: api::NcFilmResponse = serde_json::from_str(FILM_JSON).unwrap();
        let sources = client().map_film(response).unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].provider, "nguonc");
        assert_eq!(sources[0].language, StreamLanguage::ThuyetMinh);
        assert_eq!(sources[0].episodes[0].episode_number, 1);
        assert_eq!(sources[0].episodes[1].episode_number, 2);
        assert_eq!(sources[0].episodes[1].stream_url, "");
    }

    #[test]
    fn test_map_film_absent_on_error_status() {
        let response: api::NcFilmResponse =
            serde_json::from_str(r#"{"status": "error", "movie": null}"#).unwrap();
        assert!(client().map_film(response).is_none());
    }

    #[test]
    fn test_title_search_capability_is_absent() {
        let client = client();
        assert!(!client.has_title_search());
        assert!(client.as_title_search().is_none());
    }
}
