//! HTTP client for the metadata/resolver service.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::models::{
    ArtistDetailsResponse, ArtistSearchResult, PlaybackResponse, PlaybackSource, ProviderArtist,
    ProviderSong,
};
use super::{MusicProvider, ProviderError};

/// [`MusicProvider`] backed by a metadata service reachable over HTTP.
pub struct HttpMusicProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMusicProvider {
    /// Create a new provider client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the metadata service (e.g., "http://localhost:8090")
    /// * `timeout_sec` - Per-request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, ProviderError> {
        debug!("Provider request: {}", url);
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::NotFound(what.to_string())),
            StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimited),
            status if !status.is_success() => return Err(ProviderError::Status(status.as_u16())),
            _ => {}
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", what, e)))
    }
}

#[async_trait]
impl MusicProvider for HttpMusicProvider {
    async fn resolve_artist(&self, name: &str) -> Result<Option<ProviderArtist>, ProviderError> {
        let url = format!(
            "{}/search?query={}&filter=artists",
            self.base_url,
            urlencoding::encode(name)
        );
        let results: Vec<ArtistSearchResult> =
            match self.get_json(&url, &format!("artist search '{}'", name)).await {
                Ok(results) => results,
                Err(ProviderError::NotFound(_)) => return Ok(None),
                Err(err) => return Err(err),
            };

        Ok(results.into_iter().find_map(|result| {
            let id = result.browse_id?;
            Some(ProviderArtist {
                id,
                name: result.artist.unwrap_or_else(|| name.to_string()),
            })
        }))
    }

    async fn resolve_songs(&self, artist_id: &str) -> Result<Vec<ProviderSong>, ProviderError> {
        let url = format!(
            "{}/artists/{}",
            self.base_url,
            urlencoding::encode(artist_id)
        );
        let details: ArtistDetailsResponse = self
            .get_json(&url, &format!("artist {}", artist_id))
            .await?;
        Ok(details.into_songs(artist_id))
    }

    async fn resolve_playback_source(
        &self,
        external_ref: &str,
    ) -> Result<PlaybackSource, ProviderError> {
        let url = format!(
            "{}/playback?url={}&format=bestaudio",
            self.base_url,
            urlencoding::encode(external_ref)
        );
        let response: PlaybackResponse = self
            .get_json(&url, &format!("playback for {}", external_ref))
            .await?;

        match response.url {
            Some(url) if !url.is_empty() => Ok(PlaybackSource { url }),
            _ => Err(ProviderError::Malformed(format!(
                "no media url for {}",
                external_ref
            ))),
        }
    }
}
