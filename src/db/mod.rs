//! Persistence layer. The query components only see the [`SongStore`] trait;
//! the SQLite and in-memory implementations live in their own submodules.

mod connection;
mod memory;
mod songs;

use std::sync::Arc;

use anyhow::Result;

use crate::models::{Song, SongFilter, SongReplacement};

pub use connection::{default_db_path, open_in_memory, open_store};
pub use memory::MemoryStore;
pub use songs::SqliteSongStore;

/// Abstract relational store consumed by the catalog components. Every method
/// is a single round trip; implementations must not retry.
pub trait SongStore: Send + Sync {
    /// Return at most `limit` songs matching every predicate in `filter`,
    /// skipping the first `offset`, ordered by id ascending.
    fn query(&self, filter: &SongFilter, limit: u32, offset: u64) -> Result<Vec<Song>>;

    /// Fetch only the lyric text of one song. `None` when the id is unknown.
    fn find_text(&self, id: i64) -> Result<Option<String>>;

    /// Insert a row and return the id the store assigned to it.
    fn insert(
        &self,
        group: &str,
        title: &str,
        release_date: &str,
        text: &str,
        link: &str,
    ) -> Result<i64>;

    /// Overwrite every editable column. Returns the number of affected rows.
    fn update(&self, id: i64, replacement: &SongReplacement) -> Result<usize>;

    /// Remove a row. Returns the number of affected rows.
    fn delete(&self, id: i64) -> Result<usize>;
}

/// Store handle shared between components and request handlers.
pub type SharedStore = Arc<dyn SongStore>;
