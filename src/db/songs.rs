use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::SongStore;
use crate::models::{Song, SongFilter, SongReplacement};

/// SQLite-backed [`SongStore`]. The connection is not `Sync`, so access is
/// serialized through a mutex; each method holds it for one statement.
pub struct SqliteSongStore {
    conn: Mutex<Connection>,
}

impl SqliteSongStore {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("song database connection poisoned"))
    }
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        group: row.get(1)?,
        title: row.get(2)?,
        release_date: row.get(3)?,
        text: row.get(4)?,
        link: row.get(5)?,
    })
}

impl SongStore for SqliteSongStore {
    /// Unset predicates are bound as NULL and short-circuit to true, so one
    /// prepared statement covers every filter combination.
    fn query(&self, filter: &SongFilter, limit: u32, offset: u64) -> Result<Vec<Song>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, group_name, song_name, release_date, text, link
                 FROM songs
                 WHERE (?1 IS NULL OR id = ?1)
                   AND (?2 IS NULL OR contains_ci(group_name, ?2))
                   AND (?3 IS NULL OR contains_ci(song_name, ?3))
                   AND (?4 IS NULL OR contains_ci(release_date, ?4))
                   AND (?5 IS NULL OR contains_ci(text, ?5))
                   AND (?6 IS NULL OR contains_ci(link, ?6))
                 ORDER BY id
                 LIMIT ?7 OFFSET ?8",
            )
            .context("failed to prepare song search query")?;

        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let songs = stmt
            .query_map(
                params![
                    filter.id,
                    filter.group,
                    filter.title,
                    filter.release_date,
                    filter.text,
                    filter.link,
                    i64::from(limit),
                    offset,
                ],
                song_from_row,
            )
            .context("failed to iterate songs")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect songs")?;

        debug!(matched = songs.len(), "song search executed");
        Ok(songs)
    }

    fn find_text(&self, id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row("SELECT text FROM songs WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()
        .context("failed to load song text")
    }

    fn insert(
        &self,
        group: &str,
        title: &str,
        release_date: &str,
        text: &str,
        link: &str,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO songs (group_name, song_name, release_date, text, link)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![group, title, release_date, text, link],
        )
        .context("failed to insert song")?;

        Ok(conn.last_insert_rowid())
    }

    fn update(&self, id: i64, replacement: &SongReplacement) -> Result<usize> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE songs
             SET group_name = ?1, song_name = ?2, release_date = ?3, text = ?4, link = ?5
             WHERE id = ?6",
            params![
                replacement.group,
                replacement.title,
                replacement.release_date,
                replacement.text,
                replacement.link,
                id,
            ],
        )
        .context("failed to update song")
    }

    fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM songs WHERE id = ?1", params![id])
            .context("failed to delete song")
    }
}
