//! Song catalog query service.
//!
//! A single SQLite-backed table of songs exposed three ways: filtered,
//! paginated search ([`FilterQueryEngine`]), per-song verse paging
//! ([`VersePaginator`]), and create/replace/delete mutations
//! ([`SongCatalog`]). The [`api`] module serves them over HTTP and the
//! [`ui`] module wraps the same components in a terminal browser.
pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod paging;
pub mod query;
pub mod ui;
pub mod verses;

pub use catalog::{CreateSong, SongCatalog};
pub use config::Config;
pub use db::{open_store, MemoryStore, SharedStore, SongStore, SqliteSongStore};
pub use error::{CatalogError, CatalogResult};
pub use models::{Song, SongFilter, SongReplacement, VersePage};
pub use query::{FilterQueryEngine, SearchParams};
pub use ui::{run_app, App};
pub use verses::{VerseParams, VersePaginator, VerseRequest};
