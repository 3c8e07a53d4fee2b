//! Test fixtures: data directory contents, a scripted metadata provider and
//! a local media host standing in for the provider's CDN.

use super::constants::*;
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use streamcat_server::config::DataPaths;
use streamcat_server::provider::{
    MusicProvider, PlaybackSource, ProviderArtist, ProviderError, ProviderSong, Thumbnail,
};
use tokio::net::TcpListener;

// ============================================================================
// Data directory
// ============================================================================

fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn pool_entry(id: &str) -> Value {
    let (artist, song) = id.split_once('/').unwrap_or((id, id));
    json!({
        "id": id,
        "title": song.replace('_', " "),
        "artist": artist.replace('_', " "),
        "cover": format!("https://img.example/{}", song),
    })
}

/// Writes the tracked-artist list, the listener's activity and both pools.
/// The catalog file is left alone, ingestion creates it.
pub fn seed_data_dir(data_dir: &Path) -> Result<DataPaths> {
    let paths = DataPaths::under(data_dir);

    write_json(
        &paths.artists_file,
        &json!({ "artists": [ARTIST_1_NAME, ARTIST_2_NAME, UNKNOWN_ARTIST_NAME] }),
    )?;

    let user_dir = paths.users_dir.join(LISTENER_USER);
    write_json(
        &user_dir.join(format!("{}.json", LISTENER_USER)),
        &json!({ "history": [{ "id": SONG_1_ID, "playedAt": "2024-05-01T10:00:00Z" }] }),
    )?;
    write_json(
        &user_dir.join(format!("{}likedandplaylist.json", LISTENER_USER)),
        &json!({ "liked": [{ "id": SONG_3_ID }], "playlists": [] }),
    )?;

    write_json(
        &paths.popular_file,
        &json!({ "songs": POPULAR_IDS.iter().map(|id| pool_entry(id)).collect::<Vec<_>>() }),
    )?;
    write_json(
        &paths.chart_file,
        &json!({ "songs": CHART_IDS.iter().map(|id| pool_entry(id)).collect::<Vec<_>>() }),
    )?;

    Ok(paths)
}

// ============================================================================
// Media host
// ============================================================================

/// Parses `bytes=start-` and `bytes=start-end` against a body of `total` bytes.
fn parse_range(value: &str, total: usize) -> Option<(usize, usize)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    let start: usize = start.parse().ok()?;
    let end: usize = if end.is_empty() {
        total - 1
    } else {
        end.parse::<usize>().ok()?.min(total - 1)
    };
    (start <= end).then_some((start, end))
}

async fn serve_media(headers: HeaderMap) -> Response {
    let total = AUDIO_BYTES.len();
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_range(v, total));

    match range {
        Some((start, end)) => (
            StatusCode::PARTIAL_CONTENT,
            [
                (header::CONTENT_TYPE, AUDIO_CONTENT_TYPE.to_string()),
                (header::ACCEPT_RANGES, "bytes".to_string()),
                (
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, total),
                ),
            ],
            AUDIO_BYTES[start..=end].to_vec(),
        )
            .into_response(),
        None => (
            [
                (header::CONTENT_TYPE, AUDIO_CONTENT_TYPE),
                (header::ACCEPT_RANGES, "bytes"),
            ],
            AUDIO_BYTES,
        )
            .into_response(),
    }
}

/// Set when the body of an `/endless` response is dropped, which is what
/// happens once nobody is reading it anymore.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Never finishes: repeats [`AUDIO_BYTES`] every few milliseconds.
async fn serve_endless(State(dropped): State<Arc<AtomicBool>>) -> Response {
    let chunks = futures::stream::unfold(DropFlag(dropped), |flag| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Some((
            Ok::<_, std::io::Error>(Bytes::from_static(AUDIO_BYTES)),
            flag,
        ))
    });
    (
        [(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)],
        Body::from_stream(chunks),
    )
        .into_response()
}

/// Local stand-in for the provider's media CDN.
pub struct MediaHost {
    pub base_url: String,
    endless_dropped: Arc<AtomicBool>,
}

impl MediaHost {
    /// Whether an `/endless` body has been dropped by the host.
    pub fn endless_stream_dropped(&self) -> bool {
        self.endless_dropped.load(Ordering::SeqCst)
    }
}

/// Serves [`AUDIO_BYTES`] under `/media/{id}`, answers 403 on `/expired` and
/// streams forever on `/endless`.
pub async fn spawn_media_host() -> MediaHost {
    let endless_dropped = Arc::new(AtomicBool::new(false));
    let app = Router::new()
        .route("/media/{id}", get(serve_media))
        .route("/expired", get(|| async { StatusCode::FORBIDDEN }))
        .route("/endless", get(serve_endless))
        .with_state(endless_dropped.clone());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind media host");
    let addr = listener.local_addr().expect("Failed to get media host address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Media host failed");
    });
    MediaHost {
        base_url: format!("http://{}", addr),
        endless_dropped,
    }
}

// ============================================================================
// Provider
// ============================================================================

fn song(video_id: &str, title: &str, album: Option<&str>) -> ProviderSong {
    ProviderSong {
        video_id: video_id.to_string(),
        title: title.to_string(),
        album: album.map(str::to_string),
        thumbnails: vec![
            Thumbnail {
                url: format!("https://lh3.example/{}=w60-h60-l90-rj", video_id),
                width: Some(60),
                height: Some(60),
            },
            Thumbnail {
                url: format!("https://lh3.example/{}=w120-h120-l90-rj", video_id),
                width: Some(120),
                height: Some(120),
            },
        ],
    }
}

/// Scripted provider knowing two artists. Playback URLs point at a
/// [`spawn_media_host`] instance.
pub struct FakeProvider {
    media_base_url: String,
    artists: Vec<ProviderArtist>,
    songs: Mutex<HashMap<String, Vec<ProviderSong>>>,
    playback_available: AtomicBool,
    playback_expired: AtomicBool,
    playback_endless: AtomicBool,
    playback_resolutions: AtomicUsize,
}

impl FakeProvider {
    pub fn new(media_base_url: String) -> Self {
        let artists = vec![
            ProviderArtist {
                id: "UC-band".to_string(),
                name: ARTIST_1_NAME.to_string(),
            },
            ProviderArtist {
                id: "UC-jazz".to_string(),
                name: ARTIST_2_NAME.to_string(),
            },
        ];
        let mut songs = HashMap::new();
        songs.insert(
            "UC-band".to_string(),
            vec![
                song("vid-open", SONG_1_TITLE, Some(ALBUM_1_NAME)),
                song("vid-lonely", SONG_2_TITLE, None),
            ],
        );
        songs.insert(
            "UC-jazz".to_string(),
            vec![song("vid-blue", SONG_3_TITLE, Some(ALBUM_2_NAME))],
        );

        Self {
            media_base_url,
            artists,
            songs: Mutex::new(songs),
            playback_available: AtomicBool::new(true),
            playback_expired: AtomicBool::new(false),
            playback_endless: AtomicBool::new(false),
            playback_resolutions: AtomicUsize::new(0),
        }
    }

    /// Makes the provider list one more song for the first artist.
    pub fn release_song(&self, video_id: &str, title: &str) {
        self.songs
            .lock()
            .unwrap()
            .entry("UC-band".to_string())
            .or_default()
            .push(song(video_id, title, None));
    }

    /// When false, playback resolution fails as if rate limited.
    pub fn set_playback_available(&self, available: bool) {
        self.playback_available.store(available, Ordering::SeqCst);
    }

    /// When true, resolved URLs point at a media host path that answers 403.
    pub fn set_playback_expired(&self, expired: bool) {
        self.playback_expired.store(expired, Ordering::SeqCst);
    }

    /// When true, resolved URLs point at a media host path that never ends.
    pub fn set_playback_endless(&self, endless: bool) {
        self.playback_endless.store(endless, Ordering::SeqCst);
    }

    pub fn playback_resolutions(&self) -> usize {
        self.playback_resolutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MusicProvider for FakeProvider {
    async fn resolve_artist(&self, name: &str) -> Result<Option<ProviderArtist>, ProviderError> {
        Ok(self
            .artists
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn resolve_songs(&self, artist_id: &str) -> Result<Vec<ProviderSong>, ProviderError> {
        Ok(self
            .songs
            .lock()
            .unwrap()
            .get(artist_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_playback_source(
        &self,
        external_ref: &str,
    ) -> Result<PlaybackSource, ProviderError> {
        self.playback_resolutions.fetch_add(1, Ordering::SeqCst);
        if !self.playback_available.load(Ordering::SeqCst) {
            return Err(ProviderError::RateLimited);
        }
        if self.playback_expired.load(Ordering::SeqCst) {
            return Ok(PlaybackSource {
                url: format!("{}/expired", self.media_base_url),
            });
        }
        if self.playback_endless.load(Ordering::SeqCst) {
            return Ok(PlaybackSource {
                url: format!("{}/endless", self.media_base_url),
            });
        }
        let video_id = external_ref
            .rsplit_once("v=")
            .map(|(_, id)| id)
            .ok_or_else(|| ProviderError::NotFound(external_ref.to_string()))?;
        Ok(PlaybackSource {
            url: format!("{}/media/{}", self.media_base_url, video_id),
        })
    }
}
