use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use tracing::{debug, info};

use super::songs::SqliteSongStore;
use crate::models::contains_ci;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".song-catalog";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "songs.sqlite";

/// Ensure the database file exists, create the schema if needed, and wrap the
/// connection in a store handle. Foreign keys are switched on so the
/// connection behaves the same in tests and production.
pub fn open_store(path: &Path) -> Result<SqliteSongStore> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    info!(path = %path.display(), "opening song database");
    let conn = Connection::open(path).context("failed to open SQLite database")?;
    prepare_connection(&conn)?;
    Ok(SqliteSongStore::new(conn))
}

/// Private in-memory database with the same schema. Used by tests.
pub fn open_in_memory() -> Result<SqliteSongStore> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    prepare_connection(&conn)?;
    Ok(SqliteSongStore::new(conn))
}

/// Resolve the default database path inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

fn prepare_connection(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    // SQLite's own LIKE/lower() only fold ASCII.
    conn.create_scalar_function(
        "contains_ci",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack: Option<String> = ctx.get(0)?;
            let needle: Option<String> = ctx.get(1)?;
            Ok(contains_ci(
                haystack.as_deref().unwrap_or_default(),
                needle.as_deref().unwrap_or_default(),
            ))
        },
    )
    .context("failed to register contains_ci function")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_name TEXT NOT NULL,
            song_name TEXT NOT NULL,
            release_date TEXT NOT NULL DEFAULT '',
            text TEXT NOT NULL DEFAULT '',
            link TEXT NOT NULL DEFAULT ''
        )",
        [],
    )
    .context("failed to create songs table")?;

    debug!("song schema ready");
    Ok(())
}
