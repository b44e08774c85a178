use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use phimdex_models::{MediaType, Movie, StreamLanguage, StreamSource};

use crate::capabilities::{MovieCatalog, ProviderCapabilities, TitleSearch};
use crate::error::ProviderError;
use crate::kkphim::api;
use crate::mapping::build_episode;
use crate::traits::StreamProvider;

pub(crate) const PROVIDER_NAME: &str = "kkphim";

/// Adapter for the KKPhim-style catalog (phimapi.com shape).
///
/// Supports lookup by external catalog id, exact-match title search, and
/// the master latest-titles list that feeds the movie cache.
pub struct KkphimClient {
    client: Client,
    base_url: String,
}

impl KkphimClient {
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

    fn map_detail(&self, detail: api::KkDetailResponse) -> Option<Vec<StreamSource>> {
        if !detail.status {
            return None;
        }
        let movie = detail.movie?;
        let quality = movie.quality.clone().unwrap_or_default();

        let sources = detail
            .episodes
            .iter()
            .map(|server| StreamSource {
                provider: PROVIDER_NAME.to_string(),
                server_name: server.server_name.clone(),
                quality: quality.clone(),
                language: StreamLanguage::classify(&server.server_name),
                episodes: server
                    .server_data
                    .iter()
                    .enumerate()
                    .map(|(index, ep)| {
                        build_episode(
                            &ep.name,
                            &ep.slug,
                            ep.link_m3u8.as_deref(),
                            ep.link_embed.as_deref(),
                            index,
                        )
                    })
                    .collect(),
            })
            .collect();
        Some(sources)
    }

    /// Full record from the detail endpoint: trailer, description,
    /// runtime, and genres that the shallow list payload lacks.
    fn map_detail_movie(movie: api::KkMovie) -> Movie {
        let media_type = match movie.kind.as_deref() {
            Some("series") | Some("tv") | Some("hoathinh") => MediaType::Tv,
            _ => MediaType::Movie,
        };

        let external_id = movie
            .tmdb
            .as_ref()
            .and_then(|t| t.id.as_ref())
            .and_then(id_string)
            .unwrap_or_else(|| movie.slug.clone());

        let mut record = Movie::new(movie.name, media_type).with_external_id(external_id);
        record.original_title = movie.origin_name;
        record.description = movie.content;
        record.poster_url = movie.poster_url;
        record.backdrop_url = movie.thumb_url;
        record.trailer_url = movie.trailer_url;
        record.release_date = movie
            .year
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
        record.duration = movie.time.as_deref().and_then(parse_minutes);
        record.rating = movie.tmdb.as_ref().and_then(|t| t.vote_average);
        record.genres = movie.category.into_iter().map(|tag| tag.name).collect();
        record.imdb_id = movie.imdb.and_then(|i| i.id);
        record.original_language = movie.lang;
        record.provider = Some(PROVIDER_NAME.to_string());
        record
    }

    fn map_latest_item(item: api::KkLatestItem) -> Movie {
        let media_type = item
            .tmdb
            .as_ref()
            .and_then(|t| t.kind.as_deref())
            .and_then(|k| k.parse::<MediaType>().ok())
            .unwrap_or(MediaType::Movie);

        let external_id = item
            .tmdb
            .as_ref()
            .and_then(|t| t.id.as_ref())
            .and_then(id_string)
            .unwrap_or_else(|| item.slug.clone());

        let mut movie = Movie::new(item.name, media_type).with_external_id(external_id);
        movie.original_title = item.origin_name;
        movie.poster_url = item.poster_url;
        movie.backdrop_url = item.thumb_url;
        movie.release_date = item
            .year
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
        movie.rating = item.tmdb.as_ref().and_then(|t| t.vote_average);
        movie.imdb_id = item.imdb.and_then(|i| i.id);
        movie.provider = Some(PROVIDER_NAME.to_string());
        movie
    }
}

/// Runtime text like "148 phút" carries the minutes as its first number.
fn parse_minutes(time: &str) -> Option<u32> {
    time.split_whitespace().find_map(|part| part.parse().ok())
}

/// The upstream serializes the catalog id as a string or a number
/// depending on the endpoint.
fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Exact case-insensitive match against the provider's own original-name
/// field. Loose matches are rejected so a lookalike title never leaks in.
fn find_exact_match(items: Vec<api::KkSearchItem>, title: &str) -> Option<api::KkSearchItem> {
    let wanted = title.trim().to_lowercase();
    items.into_iter().find(|item| {
        item.origin_name
            .as_deref()
            .map(|origin| origin.trim().to_lowercase() == wanted)
            .unwrap_or(false)
    })
}

#[async_trait]
impl StreamProvider for KkphimClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_streams(
        &self,
        external_id: &str,
        media_type: &MediaType,
    ) -> Result<Option<Vec<StreamSource>>, ProviderError> {
        match api::get_by_external_id(&self.client, &self.base_url, media_type, external_id).await {
            Ok(detail) => Ok(self.map_detail(detail)),
            Err(e) => {
                warn!("kkphim: lookup by external id {} failed: {}", external_id, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl TitleSearch for KkphimClient {
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Option<Vec<StreamSource>>, ProviderError> {
        let response = match api::search(&self.client, &self.base_url, title).await {
            Ok(response) => response,
            Err(e) => {
                warn!("kkphim: title search for '{}' failed: {}", title, e);
                return Ok(None);
            }
        };

        let items = response.data.map(|d| d.items).unwrap_or_default();
        let matched = match find_exact_match(items, title) {
            Some(item) => item,
            None => {
                debug!("kkphim: no exact original-name match for '{}'", title);
                return Ok(None);
            }
        };
        debug!(
            "kkphim: '{}' matched '{}' (slug {})",
            title, matched.name, matched.slug
        );

        match api::get_by_slug(&self.client, &self.base_url, &matched.slug).await {
            Ok(detail) => Ok(self.map_detail(detail)),
            Err(e) => {
                warn!(
                    "kkphim: detail fetch for matched slug '{}' failed: {}",
                    matched.slug, e
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl MovieCatalog for KkphimClient {
    async fn fetch_latest(&self, page: u32) -> Result<Vec<Movie>, ProviderError> {
        let response = api::latest(&self.client, &self.base_url, page).await?;
        if !response.status {
            return Ok(Vec::new());
        }
        Ok(response
            .items
            .into_iter()
            .map(Self::map_latest_item)
            .collect())
    }

    async fn fetch_detail(
        &self,
        external_id: &str,
        media_type: &MediaType,
    ) -> Result<Option<Movie>, ProviderError> {
        let detail =
            api::get_by_external_id(&self.client, &self.base_url, media_type, external_id).await?;
        if !detail.status {
            return Ok(None);
        }
        Ok(detail.movie.map(Self::map_detail_movie))
    }
}

impl ProviderCapabilities for KkphimClient {
    fn as_title_search(&self) -> Option<&dyn TitleSearch> {
        Some(self)
    }

    fn as_movie_catalog(&self) -> Option<&dyn MovieCatalog> {
        Some(self)
    }
}
