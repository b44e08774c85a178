//! Wire types and raw requests for the KKPhim-style catalog
//! (phimapi.com shape).

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use phimdex_models::MediaType;

use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
pub(crate) struct KkDetailResponse {
    #[serde(default)]
    pub status: bool,
    pub movie: Option<KkMovie>,
    #[serde(default)]
    pub episodes: Vec<KkServer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkMovie {
    pub name: String,
    #[serde(default)]
    pub origin_name: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    /// Runtime as display text, e.g. "148 phút".
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub category: Vec<KkTag>,
    #[serde(default)]
    pub tmdb: Option<KkTmdbIds>,
    #[serde(default)]
    pub imdb: Option<KkImdbIds>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkTag {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkTmdbIds {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// The upstream serializes this as either a string or a number.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkImdbIds {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkServer {
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub server_data: Vec<KkEpisode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkEpisode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub link_embed: Option<String>,
    #[serde(default)]
    pub link_m3u8: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkSearchResponse {
    pub data: Option<KkSearchData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkSearchData {
    #[serde(default)]
    pub items: Vec<KkSearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkSearchItem {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub origin_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkLatestResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub items: Vec<KkLatestItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KkLatestItem {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub origin_name: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub tmdb: Option<KkTmdbIds>,
    #[serde(default)]
    pub imdb: Option<KkImdbIds>,
}

/// Detail lookup by external catalog id: `GET /tmdb/{movie|tv}/{id}`.
pub(crate) async fn get_by_external_id(
    client: &Client,
    base_url: &str,
    media_type: &MediaType,
    external_id: &str,
) -> Result<KkDetailResponse, ProviderError> {
    let url = format!("{}/tmdb/{}/{}", base_url, media_type.as_str(), external_id);
    fetch_json(client, &url).await
}

/// Detail lookup by provider slug: `GET /phim/{slug}`.
pub(crate) async fn get_by_slug(
    client: &Client,
    base_url: &str,
    slug: &str,
) -> Result<KkDetailResponse, ProviderError> {
    let url = format!("{}/phim/{}", base_url, slug);
    fetch_json(client, &url).await
}

/// Keyword search: `GET /v1/api/tim-kiem?keyword={q}`.
pub(crate) async fn search(
    client: &Client,
    base_url: &str,
    keyword: &str,
) -> Result<KkSearchResponse, ProviderError> {
    let url = format!(
        "{}/v1/api/tim-kiem?keyword={}",
        base_url,
        urlencoding::encode(keyword)
    );
    fetch_json(client, &url).await
}

/// Master list of recently updated titles:
/// `GET /danh-sach/phim-moi-cap-nhat?page={n}`.
pub(crate) async fn latest(
    client: &Client,
    base_url: &str,
    page: u32,
) -> Result<KkLatestResponse, ProviderError> {
    let url = format!("{}/danh-sach/phim-moi-cap-nhat?page={}", base_url, page);
    fetch_json(client, &url).await
}

async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, ProviderError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Payload {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }
    Ok(response.json::<T>().await?)
}
