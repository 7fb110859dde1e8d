//! Domain models that mirror the `songs` table and travel between the store,
//! the query components, and the HTTP/terminal front-ends. They stay plain
//! data holders so the engines can focus on filtering and pagination.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel written into `releaseDate`, `text`, and `link` when a song is
/// first created. Callers fill the real values in later through a replace.
pub const PLACEHOLDER: &str = "empty";

/// Literal two-character sequence (backslash followed by `n`) separating
/// verses inside a song's text. This is not a newline control character.
pub const VERSE_DELIMITER: &str = "\\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A catalog entry as stored in the `songs` table.
pub struct Song {
    /// Store-assigned primary key. Never reused once handed out.
    pub id: i64,
    /// Performing group or artist.
    pub group: String,
    /// Song title. Exposed on the wire as `song`.
    #[serde(rename = "song")]
    pub title: String,
    /// Free-form release date; not validated as a calendar date.
    pub release_date: String,
    /// Lyric body, verses separated by [`VERSE_DELIMITER`].
    pub text: String,
    /// Reference URL (kept as raw text so non-web references survive).
    pub link: String,
}

impl Song {
    /// `Group - Title`, falling back to the title alone when the group is
    /// blank.
    pub fn display_title(&self) -> String {
        if self.group.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.group, self.title)
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.display_title())
    }
}

/// Validated input for creating a song. Only group and title come from the
/// caller; every other column is forced to [`PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub title: String,
}

/// Whole-record replacement payload. Fields the caller omitted arrive here as
/// empty strings and are written that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongReplacement {
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Conjunction of optional per-field predicates. `None` means the field is
/// unconstrained; it matches every record, including ones with empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    /// Exact id match.
    pub id: Option<i64>,
    pub group: Option<String>,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongFilter {
    /// True when no predicate is set.
    pub fn is_unconstrained(&self) -> bool {
        self.id.is_none()
            && self.group.is_none()
            && self.title.is_none()
            && self.release_date.is_none()
            && self.text.is_none()
            && self.link.is_none()
    }

    /// Evaluate the filter against one record. The SQLite store expresses the
    /// same rule in SQL; this version backs the in-memory store and tests.
    pub fn matches(&self, song: &Song) -> bool {
        fn field_matches(needle: &Option<String>, haystack: &str) -> bool {
            needle
                .as_deref()
                .map_or(true, |needle| contains_ci(haystack, needle))
        }

        self.id.map_or(true, |id| id == song.id)
            && field_matches(&self.group, &song.group)
            && field_matches(&self.title, &song.title)
            && field_matches(&self.release_date, &song.release_date)
            && field_matches(&self.text, &song.text)
            && field_matches(&self.link, &song.link)
    }
}

/// Case-insensitive substring test using full Unicode lowercasing, so
/// Cyrillic and accented titles fold the same way ASCII ones do.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One window of a song's verses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersePage {
    pub song_id: i64,
    pub verses: Vec<String>,
    pub page: u64,
    pub page_size: u64,
    /// Number of verses in the whole song, not the number of pages.
    pub total_count: u64,
}
