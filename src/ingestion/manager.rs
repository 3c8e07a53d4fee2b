//! Ingestion Manager - runs one ingestion pass over the tracked artists.

use super::cover::normalize_cover_url;
use super::models::{ArtistOutcome, ArtistReport, IngestionReport, SkipReason};
use crate::artists::TrackedArtists;
use crate::catalog_store::{
    slugify, Catalog, CatalogStore, CatalogStoreError, SongRecord, SINGLE_ALBUM,
};
use crate::provider::{MusicProvider, ProviderSong};
use crate::server::metrics;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that abort a whole ingestion run.
///
/// Per-artist provider failures are not here: they end up in the report.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to persist catalog: {0}")]
    Persist(#[from] CatalogStoreError),

    #[error("Ingestion run cancelled")]
    Cancelled,
}

pub struct IngestionManager {
    provider: Arc<dyn MusicProvider>,
    catalog_store: Arc<CatalogStore>,
    tracked_artists: TrackedArtists,
}

impl IngestionManager {
    pub fn new(
        provider: Arc<dyn MusicProvider>,
        catalog_store: Arc<CatalogStore>,
        tracked_artists: TrackedArtists,
    ) -> Self {
        Self {
            provider,
            catalog_store,
            tracked_artists,
        }
    }

    /// Runs one ingestion pass.
    ///
    /// Artists are processed one at a time against a private copy of the
    /// catalog. The copy is saved and published once at the end, so readers
    /// never see a half-ingested catalog and a cancelled run leaves the
    /// document untouched.
    pub async fn run_once(
        &self,
        cancel: &CancellationToken,
    ) -> Result<IngestionReport, IngestionError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!("Ingestion run {} started", run_id);

        let artist_names = self.tracked_artists.load();
        if artist_names.is_empty() {
            info!(
                "Artist list {:?} is empty, add artists with cli-artists",
                self.tracked_artists.path()
            );
            return Ok(IngestionReport {
                run_id,
                started_at,
                finished_at: Utc::now(),
                artists: Vec::new(),
                catalog_saved: false,
            });
        }

        let mut catalog: Catalog = (*self.catalog_store.snapshot()).clone();
        let mut changed = false;
        let mut artists = Vec::with_capacity(artist_names.len());

        for name in artist_names {
            if cancel.is_cancelled() {
                warn!("Ingestion run {} cancelled before '{}'", run_id, name);
                return Err(IngestionError::Cancelled);
            }

            info!("Fetching songs for '{}'", name);
            let report = self.ingest_artist(&name, &mut catalog, &mut changed).await;
            metrics::record_ingested_artist(outcome_label(&report.outcome));
            artists.push(report);
        }

        if changed {
            self.catalog_store.commit(catalog)?;
            let snapshot = self.catalog_store.snapshot();
            metrics::set_catalog_size(snapshot.artists_count(), snapshot.songs_count());
        } else {
            debug!("Catalog unchanged, not saving");
        }

        let report = IngestionReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            artists,
            catalog_saved: changed,
        };
        metrics::record_songs_added(report.songs_added());

        info!(
            "Ingestion run {} done: {} songs added, {} artists ingested, {} skipped, {} failed",
            report.run_id,
            report.songs_added(),
            report.ingested_count(),
            report.skipped_count(),
            report.failed_count()
        );
        Ok(report)
    }

    async fn ingest_artist(
        &self,
        name: &str,
        catalog: &mut Catalog,
        changed: &mut bool,
    ) -> ArtistReport {
        let artist = match self.provider.resolve_artist(name).await {
            Ok(Some(artist)) => artist,
            Ok(None) => {
                info!("No artist named '{}' found on provider", name);
                return ArtistReport {
                    name: name.to_string(),
                    slug: None,
                    outcome: ArtistOutcome::Skipped {
                        reason: SkipReason::NotFoundOnProvider,
                    },
                };
            }
            Err(err) => {
                error!("Error while processing '{}': {}", name, err);
                return ArtistReport {
                    name: name.to_string(),
                    slug: None,
                    outcome: ArtistOutcome::Failed {
                        error: err.to_string(),
                    },
                };
            }
        };

        let artist_slug = slugify(&artist.name);
        if catalog.ensure_artist(&artist_slug) {
            *changed = true;
        }

        let songs = match self.provider.resolve_songs(&artist.id).await {
            Ok(songs) => songs,
            Err(err) => {
                error!("Error while processing '{}': {}", name, err);
                return ArtistReport {
                    name: name.to_string(),
                    slug: Some(artist_slug),
                    outcome: ArtistOutcome::Failed {
                        error: err.to_string(),
                    },
                };
            }
        };

        if songs.is_empty() {
            info!("No songs found for '{}'", name);
            return ArtistReport {
                name: name.to_string(),
                slug: Some(artist_slug),
                outcome: ArtistOutcome::Skipped {
                    reason: SkipReason::NoSongs,
                },
            };
        }

        let mut added = 0;
        let mut already_present = 0;
        for song in &songs {
            let song_slug = slugify(&song.title);
            if catalog.contains(&artist_slug, &song_slug) {
                already_present += 1;
                continue;
            }

            let record = build_record(&artist.name, &artist_slug, &song_slug, song);
            if catalog.merge(&artist_slug, &song_slug, record) {
                debug!("  + Added: {}", song.title);
                added += 1;
            }
        }

        if added > 0 {
            *changed = true;
        }

        ArtistReport {
            name: name.to_string(),
            slug: Some(artist_slug),
            outcome: ArtistOutcome::Ingested {
                added,
                already_present,
            },
        }
    }
}

fn build_record(
    artist_name: &str,
    artist_slug: &str,
    song_slug: &str,
    song: &ProviderSong,
) -> SongRecord {
    SongRecord {
        title: song.title.clone(),
        artist: artist_name.to_string(),
        album: song
            .album
            .clone()
            .filter(|album| !album.is_empty())
            .unwrap_or_else(|| SINGLE_ALBUM.to_string()),
        external_ref: song.external_ref(),
        cover_url: song
            .largest_thumbnail()
            .map(normalize_cover_url)
            .unwrap_or_default(),
        proxy_path: SongRecord::proxy_path_for(artist_slug, song_slug),
    }
}

fn outcome_label(outcome: &ArtistOutcome) -> &'static str {
    match outcome {
        ArtistOutcome::Ingested { .. } => "ingested",
        ArtistOutcome::Skipped { .. } => "skipped",
        ArtistOutcome::Failed { .. } => "failed",
    }
}
