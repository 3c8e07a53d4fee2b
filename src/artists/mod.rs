//! Tracked-artist list: the artists the ingestion job scrapes.
//!
//! Persisted as `{"artists": [...]}`. The ingestion job only reads it;
//! the `cli-artists` binary edits it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ArtistListError {
    #[error("Failed to write artist list {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize artist list: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ArtistListDocument {
    #[serde(default)]
    artists: Vec<String>,
}

pub struct TrackedArtists {
    path: PathBuf,
}

impl TrackedArtists {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Artist names in insertion order. Missing or unreadable lists are empty.
    pub fn load(&self) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not read artist list {:?}: {}", self.path, err);
                }
                return Vec::new();
            }
        };

        match serde_json::from_str::<ArtistListDocument>(&content) {
            Ok(doc) => doc.artists,
            Err(err) => {
                warn!("Artist list {:?} is not valid JSON: {}", self.path, err);
                Vec::new()
            }
        }
    }

    fn save(&self, artists: Vec<String>) -> Result<(), ArtistListError> {
        let content = serde_json::to_string_pretty(&ArtistListDocument { artists })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ArtistListError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| ArtistListError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Appends `name` unless it is already tracked. Returns whether it was added.
    pub fn add(&self, name: &str) -> Result<bool, ArtistListError> {
        let mut artists = self.load();
        if artists.iter().any(|a| a == name) {
            return Ok(false);
        }
        artists.push(name.to_string());
        self.save(artists)?;
        Ok(true)
    }

    /// Removes `name` if tracked. Returns whether it was removed.
    pub fn remove(&self, name: &str) -> Result<bool, ArtistListError> {
        let mut artists = self.load();
        let before = artists.len();
        artists.retain(|a| a != name);
        if artists.len() == before {
            return Ok(false);
        }
        self.save(artists)?;
        Ok(true)
    }
}
