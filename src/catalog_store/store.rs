//! File-backed catalog persistence.

use super::models::{Catalog, SearchHit, SongRecord};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CatalogStoreError {
    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write catalog document {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the catalog document at `path`.
///
/// A missing or unreadable document yields an empty catalog: a broken file
/// must not keep the server from starting, the next ingestion run rebuilds it.
pub fn load_catalog(path: &Path) -> Catalog {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("No catalog document at {:?}, starting empty", path);
            return Catalog::new();
        }
        Err(err) => {
            warn!("Could not open catalog {:?}, starting empty: {}", path, err);
            return Catalog::new();
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!("Catalog {:?} is corrupt, starting empty: {}", path, err);
            Catalog::new()
        }
    }
}

/// Atomically replaces the catalog document at `path`.
///
/// The catalog is written to a temporary file in the same directory and then
/// renamed over the target, so a reader (or a crash) only ever sees a
/// complete document.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), CatalogStoreError> {
    let write_err = |source: std::io::Error| CatalogStoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut temp_file = NamedTempFile::new_in(dir).map_err(write_err)?;
    serde_json::to_writer_pretty(&mut temp_file, catalog)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;
    temp_file.persist(path).map_err(|e| write_err(e.error))?;

    debug!(
        "Saved catalog to {:?} ({} artists, {} songs)",
        path,
        catalog.artists_count(),
        catalog.songs_count()
    );
    Ok(())
}

/// Owner of the catalog document and of the snapshot served to readers.
///
/// Readers take an `Arc` to the current snapshot and never block the
/// writer for longer than a pointer swap.
pub struct CatalogStore {
    path: PathBuf,
    snapshot: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    /// Loads the document at `path` (or an empty catalog) as the first snapshot.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let catalog = load_catalog(&path);
        info!(
            "Catalog loaded from {:?}: {} artists, {} songs",
            path,
            catalog.artists_count(),
            catalog.songs_count()
        );
        Self {
            path,
            snapshot: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn get_song(&self, artist_slug: &str, song_slug: &str) -> Option<SongRecord> {
        self.snapshot().get(artist_slug, song_slug).cloned()
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.snapshot().search(query)
    }

    /// Persists `catalog` and, once it is safely on disk, makes it the
    /// snapshot every reader sees.
    pub fn commit(&self, catalog: Catalog) -> Result<(), CatalogStoreError> {
        save_catalog(&self.path, &catalog)?;
        let catalog = Arc::new(catalog);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = catalog,
            Err(poisoned) => *poisoned.into_inner() = catalog,
        }
        Ok(())
    }
}
