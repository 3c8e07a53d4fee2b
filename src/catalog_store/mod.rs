//! Song catalog: the persisted artist -> song -> metadata mapping.
//!
//! The catalog is a plain value ([`Catalog`]) with pure merge/search
//! operations. [`CatalogStore`] owns the document path and the published
//! snapshot that request handlers read from.

mod models;
mod slug;
mod store;

pub use models::{Catalog, SearchHit, SongRecord, SINGLE_ALBUM};
pub use slug::slugify;
pub use store::{load_catalog, save_catalog, CatalogStore, CatalogStoreError};
