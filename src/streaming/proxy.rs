use crate::catalog_store::CatalogStore;
use crate::provider::MusicProvider;
use anyhow::Result;
use axum::body::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{
    HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Song {artist}/{song} is not in the catalog")]
    NotFound { artist: String, song: String },

    #[error("Song {artist}/{song} cannot be streamed right now: {reason}")]
    Unavailable {
        artist: String,
        song: String,
        reason: String,
    },
}

/// An open upstream response, ready to be relayed to the client.
pub struct UpstreamStream {
    /// 200, or 206 when a range was requested and honored.
    pub status: u16,
    pub content_type: String,
    pub content_length: Option<String>,
    pub content_range: Option<String>,
    pub accept_ranges: Option<String>,
    pub body: BoxStream<'static, Result<Bytes, std::io::Error>>,
}

pub struct StreamProxy {
    catalog_store: Arc<CatalogStore>,
    provider: Arc<dyn MusicProvider>,
    client: reqwest::Client,
    upstream_timeout: Duration,
}

impl StreamProxy {
    /// `upstream_timeout_sec` bounds connecting to the media host and waiting
    /// for its response headers. The body itself is not time limited, a long
    /// song is a long download.
    pub fn new(
        catalog_store: Arc<CatalogStore>,
        provider: Arc<dyn MusicProvider>,
        upstream_timeout_sec: u64,
    ) -> Result<Self> {
        let upstream_timeout = Duration::from_secs(upstream_timeout_sec);
        let client = reqwest::Client::builder()
            .connect_timeout(upstream_timeout)
            .build()?;
        Ok(Self {
            catalog_store,
            provider,
            client,
            upstream_timeout,
        })
    }

    pub async fn open_stream(
        &self,
        artist_slug: &str,
        song_slug: &str,
        range: Option<&str>,
    ) -> Result<UpstreamStream, StreamError> {
        let unavailable = |reason: String| StreamError::Unavailable {
            artist: artist_slug.to_string(),
            song: song_slug.to_string(),
            reason,
        };

        let record = self
            .catalog_store
            .get_song(artist_slug, song_slug)
            .ok_or_else(|| StreamError::NotFound {
                artist: artist_slug.to_string(),
                song: song_slug.to_string(),
            })?;

        let source = self
            .provider
            .resolve_playback_source(&record.external_ref)
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        debug!("Resolved media url for {}/{}", artist_slug, song_slug);

        let mut request = self.client.get(&source.url);
        if let Some(range) = range {
            request = request.header(RANGE, range);
        }

        let response = match tokio::time::timeout(self.upstream_timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(unavailable(format!("upstream request failed: {}", err))),
            Err(_) => {
                return Err(unavailable(format!(
                    "no upstream response within {}s",
                    self.upstream_timeout.as_secs()
                )))
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Upstream answered {} for {}/{}",
                status, artist_slug, song_slug
            );
            return Err(unavailable(format!("upstream status {}", status)));
        }

        let headers = response.headers();
        let content_type =
            header_value(headers, CONTENT_TYPE).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let content_length = header_value(headers, CONTENT_LENGTH);
        let content_range = header_value(headers, CONTENT_RANGE);
        let accept_ranges = header_value(headers, ACCEPT_RANGES);

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();

        Ok(UpstreamStream {
            status: status.as_u16(),
            content_type,
            content_length,
            content_range,
            accept_ranges,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
