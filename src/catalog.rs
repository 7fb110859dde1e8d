//! Record mutations: create, whole-record replace, delete.

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::db::SharedStore;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewSong, Song, SongReplacement, PLACEHOLDER};

/// Creation payload. Only `group` and `song` are read; anything else the
/// caller sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSong {
    pub group: Option<String>,
    #[serde(rename = "song")]
    pub title: Option<String>,
}

impl CreateSong {
    /// Both fields are required and must contain more than whitespace.
    pub fn validate(&self) -> CatalogResult<NewSong> {
        fn required(value: &Option<String>, name: &str) -> CatalogResult<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| CatalogError::validation(format!("Field '{name}' is required")))
        }

        Ok(NewSong {
            group: required(&self.group, "group")?,
            title: required(&self.title, "song")?,
        })
    }
}

#[derive(Clone)]
pub struct SongCatalog {
    store: SharedStore,
}

impl SongCatalog {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Validate and insert. Release date, text, and link start out as
    /// [`PLACEHOLDER`]. Nothing is written when validation fails.
    pub fn create(&self, request: &CreateSong) -> CatalogResult<Song> {
        let new_song = request.validate()?;
        self.insert(new_song)
    }

    pub fn insert(&self, new_song: NewSong) -> CatalogResult<Song> {
        let id = self
            .store
            .insert(
                &new_song.group,
                &new_song.title,
                PLACEHOLDER,
                PLACEHOLDER,
                PLACEHOLDER,
            )
            .context("song creation failed")
            .map_err(CatalogError::Mutation)?;

        info!(id, group = %new_song.group, title = %new_song.title, "song created");
        Ok(Song {
            id,
            group: new_song.group,
            title: new_song.title,
            release_date: PLACEHOLDER.to_string(),
            text: PLACEHOLDER.to_string(),
            link: PLACEHOLDER.to_string(),
        })
    }

    /// Overwrite every field of song `id`. Not-found when no row was touched.
    pub fn replace(&self, id: i64, replacement: &SongReplacement) -> CatalogResult<()> {
        let affected = self
            .store
            .update(id, replacement)
            .context("song update failed")
            .map_err(CatalogError::Mutation)?;

        if affected == 0 {
            return Err(CatalogError::NotFound { id });
        }
        info!(id, "song replaced");
        Ok(())
    }

    /// Remove song `id`. Not-found when no row was touched.
    pub fn delete(&self, id: i64) -> CatalogResult<()> {
        let affected = self
            .store
            .delete(id)
            .context("song deletion failed")
            .map_err(CatalogError::Mutation)?;

        if affected == 0 {
            return Err(CatalogError::NotFound { id });
        }
        info!(id, "song deleted");
        Ok(())
    }
}
