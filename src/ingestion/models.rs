use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The provider returned no artist for the tracked name.
    NotFoundOnProvider,
    /// The artist exists but the provider lists no songs for it.
    NoSongs,
}

/// What happened to a single tracked artist during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtistOutcome {
    Ingested {
        added: usize,
        already_present: usize,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        error: String,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct ArtistReport {
    /// Name as written in the tracked-artist list.
    pub name: String,
    /// Catalog slug, known once the provider resolved the artist.
    pub slug: Option<String>,
    pub outcome: ArtistOutcome,
}

#[derive(Clone, Debug, Serialize)]
pub struct IngestionReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub artists: Vec<ArtistReport>,
    /// False when nothing changed and the document was left as is.
    pub catalog_saved: bool,
}

impl IngestionReport {
    pub fn songs_added(&self) -> usize {
        self.artists
            .iter()
            .map(|a| match a.outcome {
                ArtistOutcome::Ingested { added, .. } => added,
                _ => 0,
            })
            .sum()
    }

    pub fn ingested_count(&self) -> usize {
        self.count(|o| matches!(o, ArtistOutcome::Ingested { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ArtistOutcome::Skipped { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ArtistOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&ArtistOutcome) -> bool) -> usize {
        self.artists.iter().filter(|a| predicate(&a.outcome)).count()
    }
}
