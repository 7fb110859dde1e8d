//! Verse view: splits a song's text into verses and serves one page of them.
//!
//! The verse view speaks in `page`/`limit`, unlike the search engine's
//! `limit`/`offset`. Keep the two vocabularies apart; existing callers send
//! both.

use std::ops::Range;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::db::SharedStore;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{VersePage, VERSE_DELIMITER};
use crate::paging::{parse_id, parse_limit, parse_page};

/// Raw verse-page parameters as they arrive from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerseParams {
    pub id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated verse-page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRequest {
    pub song_id: i64,
    pub page: u64,
    pub limit: u32,
}

impl VerseRequest {
    pub fn new(song_id: i64, page: u64, limit: u32) -> Self {
        Self {
            song_id,
            page: page.max(1),
            limit: limit.max(1),
        }
    }
}

impl TryFrom<&VerseParams> for VerseRequest {
    type Error = CatalogError;

    fn try_from(params: &VerseParams) -> CatalogResult<Self> {
        Ok(Self {
            song_id: parse_id(params.id.as_deref())?,
            page: parse_page(params.page.as_deref()),
            limit: parse_limit(params.limit.as_deref()),
        })
    }
}

/// Split text on the literal `\n` delimiter. Text without the delimiter,
/// including the empty string, is a single verse.
pub fn split_verses(text: &str) -> Vec<&str> {
    text.split(VERSE_DELIMITER).collect()
}

/// Index range of the requested page, or `None` when the page starts at or
/// past the last verse.
pub fn page_window(total: usize, page: u64, limit: u32) -> Option<Range<usize>> {
    let start = page.saturating_sub(1).saturating_mul(u64::from(limit));
    let start = usize::try_from(start).ok().filter(|&start| start < total)?;
    let end = start.saturating_add(limit as usize).min(total);
    Some(start..end)
}

#[derive(Clone)]
pub struct VersePaginator {
    store: SharedStore,
}

impl VersePaginator {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Validate raw parameters, then fetch the page. A bad id is rejected
    /// before the store is touched.
    pub fn get(&self, params: &VerseParams) -> CatalogResult<VersePage> {
        let request = VerseRequest::try_from(params)?;
        self.get_verse_page(request)
    }

    pub fn get_verse_page(&self, request: VerseRequest) -> CatalogResult<VersePage> {
        let text = self
            .store
            .find_text(request.song_id)
            .context("verse lookup failed")
            .map_err(CatalogError::Retrieval)?
            .ok_or(CatalogError::NotFound {
                id: request.song_id,
            })?;

        let verses = split_verses(&text);
        let total = verses.len();
        let window = page_window(total, request.page, request.limit);
        debug!(
            song_id = request.song_id,
            page = request.page,
            total,
            empty = window.is_none(),
            "serving verse page"
        );

        let verses = window
            .map(|range| verses[range].iter().map(|v| v.to_string()).collect())
            .unwrap_or_default();

        Ok(VersePage {
            song_id: request.song_id,
            verses,
            page: request.page,
            page_size: u64::from(request.limit),
            total_count: total as u64,
        })
    }
}
