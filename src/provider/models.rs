//! Provider-side response shapes and the domain types they convert into.
//!
//! The wire types mirror the JSON returned by the metadata service (which
//! follows YouTube Music's naming) and never leave this module.

use serde::Deserialize;
use tracing::warn;

const WATCH_URL_PREFIX: &str = "https://music.youtube.com/watch?v=";

// =============================================================================
// Domain types
// =============================================================================

/// Best provider match for a tracked artist name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderArtist {
    pub id: String,
    /// Display name as the provider spells it.
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSong {
    pub video_id: String,
    pub title: String,
    pub album: Option<String>,
    /// Ordered from smallest to largest, as the provider lists them.
    pub thumbnails: Vec<Thumbnail>,
}

impl ProviderSong {
    /// Stable link to the track, later handed back to
    /// [`super::MusicProvider::resolve_playback_source`].
    pub fn external_ref(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.video_id)
    }

    pub fn largest_thumbnail(&self) -> Option<&str> {
        self.thumbnails.last().map(|t| t.url.as_str())
    }
}

/// Direct media URL. Expires after a short, provider-defined time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackSource {
    pub url: String,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ArtistSearchResult {
    pub browse_id: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArtistDetailsResponse {
    pub songs: Option<SongsSection>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SongsSection {
    #[serde(default)]
    pub results: Vec<SongEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SongEntry {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlbumRef {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ThumbnailEntry {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaybackResponse {
    pub url: Option<String>,
}

impl ArtistDetailsResponse {
    /// Songs usable for ingestion. Entries without a video id or title are
    /// dropped, one bad entry doesn't invalidate the whole artist.
    pub fn into_songs(self, artist_id: &str) -> Vec<ProviderSong> {
        let entries = self.songs.map(|s| s.results).unwrap_or_default();
        entries
            .into_iter()
            .filter_map(|entry| {
                let (video_id, title) = match (entry.video_id, entry.title) {
                    (Some(video_id), Some(title)) => (video_id, title),
                    _ => {
                        warn!("Dropping song entry without id or title for artist {}", artist_id);
                        return None;
                    }
                };
                Some(ProviderSong {
                    video_id,
                    title,
                    album: entry.album.and_then(|a| a.name),
                    thumbnails: entry
                        .thumbnails
                        .into_iter()
                        .map(|t| Thumbnail {
                            url: t.url,
                            width: t.width,
                            height: t.height,
                        })
                        .collect(),
                })
            })
            .collect()
    }
}
