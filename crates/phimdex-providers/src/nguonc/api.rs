//! Wire types and raw requests for the NguonC-style catalog
//! (phim.nguonc.com shape).

use reqwest::Client;
use serde::Deserialize;

use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
pub(crate) struct NcFilmResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub movie: Option<NcMovie>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NcMovie {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub episodes: Vec<NcServer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NcServer {
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub items: Vec<NcEpisode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NcEpisode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default)]
    pub m3u8: Option<String>,
}

/// Film lookup: `GET /api/film/{id}`. The upstream addresses titles by
/// its own slug-style id.
pub(crate) async fn get_film(
    client: &Client,
    base_url: &str,
    id: &str,
) -> Result<NcFilmResponse, ProviderError> {
    let url = format!("{}/api/film/{}", base_url, id);
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Payload {
            url,
            reason: format!("HTTP {}", status),
        });
    }
    Ok(response.json::<NcFilmResponse>().await?)
}
