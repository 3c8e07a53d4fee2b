//! Specific background job implementations.

pub mod catalog_ingestion;

pub use catalog_ingestion::CatalogIngestionJob;
