use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Album name stored for songs the provider doesn't attach to an album.
pub const SINGLE_ALBUM: &str = "Single";

/// A playable song, keyed in the catalog by `(artist_slug, song_slug)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Canonical link to the source track on the provider.
    #[serde(alias = "youtube_url")]
    pub external_ref: String,
    pub cover_url: String,
    /// Path clients hit to stream this song through the proxy.
    #[serde(alias = "proxy_stream_url")]
    pub proxy_path: String,
}

impl SongRecord {
    pub fn proxy_path_for(artist_slug: &str, song_slug: &str) -> String {
        format!("/stream/{}/{}", artist_slug, song_slug)
    }
}

/// Search result card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// `"artist_slug/song_slug"`
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: String,
}

/// The whole catalog, artist slug -> song slug -> record.
///
/// Keys are kept sorted, which fixes both the on-disk layout and the order
/// in which [`Catalog::search`] reports matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    artists: BTreeMap<String, BTreeMap<String, SongRecord>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    pub fn artists_count(&self) -> usize {
        self.artists.len()
    }

    pub fn songs_count(&self) -> usize {
        self.artists.values().map(|songs| songs.len()).sum()
    }

    pub fn artist_songs_count(&self, artist_slug: &str) -> usize {
        self.artists.get(artist_slug).map_or(0, |songs| songs.len())
    }

    pub fn has_artist(&self, artist_slug: &str) -> bool {
        self.artists.contains_key(artist_slug)
    }

    pub fn contains(&self, artist_slug: &str, song_slug: &str) -> bool {
        self.get(artist_slug, song_slug).is_some()
    }

    pub fn get(&self, artist_slug: &str, song_slug: &str) -> Option<&SongRecord> {
        self.artists.get(artist_slug)?.get(song_slug)
    }

    /// Creates an empty bucket for the artist. Returns true if it was missing.
    pub fn ensure_artist(&mut self, artist_slug: &str) -> bool {
        if self.artists.contains_key(artist_slug) {
            return false;
        }
        self.artists.insert(artist_slug.to_string(), BTreeMap::new());
        true
    }

    /// Inserts the record only if the key is absent.
    ///
    /// An existing record is never touched, whatever the incoming metadata
    /// says. Returns whether the record was inserted.
    pub fn merge(&mut self, artist_slug: &str, song_slug: &str, record: SongRecord) -> bool {
        let songs = self.artists.entry(artist_slug.to_string()).or_default();
        if songs.contains_key(song_slug) {
            return false;
        }
        songs.insert(song_slug.to_string(), record);
        true
    }

    /// Iterates `(artist_slug, song_slug, record)` in catalog order.
    pub fn songs(&self) -> impl Iterator<Item = (&str, &str, &SongRecord)> {
        self.artists.iter().flat_map(|(artist_slug, songs)| {
            songs
                .iter()
                .map(move |(song_slug, record)| (artist_slug.as_str(), song_slug.as_str(), record))
        })
    }

    /// Case-insensitive substring match on title, artist and album.
    ///
    /// This is a linear scan of the whole catalog on every call. That is fine
    /// for a single-operator catalog; a bigger deployment would need an index
    /// that preserves this ordering. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.songs()
            .filter(|(_, _, song)| {
                song.title.to_lowercase().contains(&query)
                    || song.artist.to_lowercase().contains(&query)
                    || song.album.to_lowercase().contains(&query)
            })
            .map(|(artist_slug, song_slug, song)| SearchHit {
                id: format!("{}/{}", artist_slug, song_slug),
                title: song.title.clone(),
                artist: song.artist.clone(),
                album: song.album.clone(),
                cover: song.cover_url.clone(),
            })
            .collect()
    }
}
