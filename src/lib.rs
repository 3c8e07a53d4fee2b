//! Streamcat Server Library
//!
//! This library exposes the internal modules for testing and for the binaries.

pub mod artists;
pub mod background_jobs;
pub mod catalog_store;
pub mod config;
pub mod ingestion;
pub mod provider;
pub mod recommendation;
pub mod server;
pub mod streaming;

// Re-export commonly used types for convenience
pub use catalog_store::CatalogStore;
pub use ingestion::IngestionManager;
pub use provider::{HttpMusicProvider, MusicProvider};
pub use recommendation::RecommendationEngine;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerState};
pub use streaming::StreamProxy;
