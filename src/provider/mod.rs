//! Adapter for the external music-metadata provider.
//!
//! Everything provider-specific (URLs, JSON shapes, status codes) stays behind
//! [`MusicProvider`]. Callers get typed [`ProviderError`]s and decide
//! themselves whether to skip, retry or give up: nothing here retries.

mod client;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpMusicProvider;
pub use models::{PlaybackSource, ProviderArtist, ProviderSong, Thumbnail};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Not found on provider: {0}")]
    NotFound(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Provider responded with status {0}")]
    Status(u16),

    #[error("Provider request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error("Provider request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Transport(err)
        }
    }
}

#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Best match for an artist name, `None` if the provider knows no such artist.
    async fn resolve_artist(&self, name: &str) -> Result<Option<ProviderArtist>, ProviderError>;

    /// Songs listed for the artist, in provider order.
    async fn resolve_songs(&self, artist_id: &str) -> Result<Vec<ProviderSong>, ProviderError>;

    /// Resolves a direct media URL for a song's external reference.
    ///
    /// The URL expires quickly; callers must resolve again for every
    /// playback instead of storing it.
    async fn resolve_playback_source(
        &self,
        external_ref: &str,
    ) -> Result<PlaybackSource, ProviderError>;
}
