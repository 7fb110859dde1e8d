//! Filter-and-paginate search over the song store.

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::db::SharedStore;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Song, SongFilter};
use crate::paging::{parse_id, Pagination};

/// Default ceiling applied to `limit`.
pub const DEFAULT_MAX_LIMIT: u32 = 100;

/// Raw search parameters exactly as a caller supplies them. Every field is
/// optional and empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub id: Option<String>,
    pub group: Option<String>,
    #[serde(rename = "song")]
    pub title: Option<String>,
    #[serde(rename = "realiseDate")]
    pub release_date: Option<String>,
    /// Accepted spelling of `realiseDate`; ignored when both are sent.
    #[serde(rename = "releaseDate")]
    pub release_date_alt: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchParams {
    /// Build the predicate set. Only a non-empty, non-numeric `id` can fail.
    pub fn filter(&self) -> CatalogResult<SongFilter> {
        fn present(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        let id = match self.id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_id(Some(raw))?),
        };

        Ok(SongFilter {
            id,
            group: present(&self.group),
            title: present(&self.title),
            release_date: present(&self.release_date)
                .or_else(|| present(&self.release_date_alt)),
            text: present(&self.text),
            link: present(&self.link),
        })
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// Translates optional field filters plus pagination into one bounded store
/// query.
#[derive(Clone)]
pub struct FilterQueryEngine {
    store: SharedStore,
    max_limit: u32,
}

impl FilterQueryEngine {
    pub fn new(store: SharedStore) -> Self {
        Self::with_max_limit(store, DEFAULT_MAX_LIMIT)
    }

    /// `max_limit` of zero leaves `limit` unbounded.
    pub fn with_max_limit(store: SharedStore, max_limit: u32) -> Self {
        Self { store, max_limit }
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// Parse raw parameters and run the search.
    pub fn search(&self, params: &SearchParams) -> CatalogResult<Vec<Song>> {
        let filter = params.filter()?;
        self.run(&filter, params.pagination())
    }

    /// Run an already-built filter. Zero matches is an empty list.
    pub fn run(&self, filter: &SongFilter, page: Pagination) -> CatalogResult<Vec<Song>> {
        let page = page.capped(self.max_limit);
        debug!(?filter, limit = page.limit, offset = page.offset, "searching songs");
        self.store
            .query(filter, page.limit, page.offset)
            .context("song search failed")
            .map_err(CatalogError::Retrieval)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{MemoryStore, SongStore};

    fn params() -> SearchParams {
        SearchParams::default()
    }

    fn engine_with(count: usize) -> (Arc<MemoryStore>, FilterQueryEngine) {
        let store = Arc::new(MemoryStore::new());
        for n in 1..=count {
            let group = if n % 2 == 0 { "Even Band" } else { "odd band" };
            store
                .insert(group, &format!("Track {n}"), "2001", "la\\nla", "")
                .unwrap();
        }
        let engine = FilterQueryEngine::new(store.clone());
        (store, engine)
    }

    #[test]
    fn empty_filters_match_everything_up_to_the_default_limit() {
        let (_, engine) = engine_with(15);
        let songs = engine.search(&params()).unwrap();
        assert_eq!(songs.len(), 10);
        assert_eq!(songs[0].id, 1);

        let blank = SearchParams {
            group: Some(String::new()),
            title: Some(String::new()),
            id: Some(String::new()),
            ..params()
        };
        assert_eq!(engine.search(&blank).unwrap().len(), 10);
    }

    #[test]
    fn every_result_contains_each_filter_value() {
        let (_, engine) = engine_with(15);
        let found = engine
            .search(&SearchParams {
                group: Some("BAND".to_string()),
                title: Some("track 1".to_string()),
                limit: Some("50".to_string()),
                ..params()
            })
            .unwrap();
        assert!(!found.is_empty());
        for song in &found {
            assert!(song.group.to_lowercase().contains("band"));
            assert!(song.title.to_lowercase().contains("track 1"));
        }
        // Track 1 and Track 10..=15
        assert_eq!(found.len(), 7);
    }

    #[test]
    fn invalid_limit_and_offset_use_defaults() {
        let (_, engine) = engine_with(15);
        for raw in ["0", "-3", "many"] {
            let songs = engine
                .search(&SearchParams {
                    limit: Some(raw.to_string()),
                    ..params()
                })
                .unwrap();
            assert_eq!(songs.len(), 10, "limit={raw}");
        }
        for raw in ["-1", "later"] {
            let songs = engine
                .search(&SearchParams {
                    offset: Some(raw.to_string()),
                    ..params()
                })
                .unwrap();
            assert_eq!(songs[0].id, 1, "offset={raw}");
        }
    }

    #[test]
    fn offset_skips_in_id_order() {
        let (_, engine) = engine_with(15);
        let songs = engine
            .search(&SearchParams {
                limit: Some("5".to_string()),
                offset: Some("12".to_string()),
                ..params()
            })
            .unwrap();
        let ids: Vec<i64> = songs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![13, 14, 15]);
    }

    #[test]
    fn limit_is_capped() {
        let store = Arc::new(MemoryStore::new());
        for n in 0..8 {
            store.insert("g", &format!("t{n}"), "", "", "").unwrap();
        }
        let engine = FilterQueryEngine::with_max_limit(store, 3);
        let songs = engine
            .search(&SearchParams {
                limit: Some("1000".to_string()),
                ..params()
            })
            .unwrap();
        assert_eq!(songs.len(), 3);
    }

    #[test]
    fn id_filter_matches_exactly() {
        let (_, engine) = engine_with(12);
        let songs = engine
            .search(&SearchParams {
                id: Some("1".to_string()),
                ..params()
            })
            .unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, 1);
    }

    #[test]
    fn non_numeric_id_filter_is_rejected_before_querying() {
        let (store, engine) = engine_with(3);
        let err = engine
            .search(&SearchParams {
                id: Some("one".to_string()),
                ..params()
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(store.read_count(), 0);
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let (_, engine) = engine_with(3);
        let songs = engine
            .search(&SearchParams {
                link: Some("nothing-has-this".to_string()),
                ..params()
            })
            .unwrap();
        assert!(songs.is_empty());
    }

    #[test]
    fn realise_date_wins_over_release_date() {
        let params = SearchParams {
            release_date: Some("1975".to_string()),
            release_date_alt: Some("2001".to_string()),
            ..params()
        };
        assert_eq!(params.filter().unwrap().release_date.as_deref(), Some("1975"));

        let params = SearchParams {
            release_date: Some(String::new()),
            release_date_alt: Some("2001".to_string()),
            ..self::params()
        };
        assert_eq!(params.filter().unwrap().release_date.as_deref(), Some("2001"));
    }

    #[test]
    fn store_failure_is_a_retrieval_error() {
        let (store, engine) = engine_with(3);
        store.set_unavailable(true);
        let err = engine.search(&params()).unwrap_err();
        assert!(matches!(err, CatalogError::Retrieval(_)));
    }
}
