//! Catalog ingestion from the metadata provider.
//!
//! One run:
//! 1. Read the tracked-artist list (empty list: nothing to do)
//! 2. For every artist, resolve it on the provider and fetch its songs
//! 3. Merge songs whose slug is not yet in the catalog, leave the rest alone
//! 4. Persist the catalog once, after all artists
//!
//! A failing artist is recorded in the run report and the run moves on.

mod cover;
mod manager;
mod models;

pub use cover::normalize_cover_url;
pub use manager::{IngestionError, IngestionManager};
pub use models::{ArtistOutcome, ArtistReport, IngestionReport, SkipReason};
