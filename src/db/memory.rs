use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};

use super::SongStore;
use crate::models::{Song, SongFilter, SongReplacement};

/// Process-local [`SongStore`] with the same predicate and ordering rules as
/// the SQLite store. Backs `serve --memory` and the component tests, which
/// also use the access counters and the outage switch.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct Inner {
    songs: BTreeMap<i64, Song>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read calls (`query`, `find_text`) seen so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls (`insert`, `update`, `delete`) seen so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail, simulating a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self, counter: &AtomicUsize) -> Result<MutexGuard<'_, Inner>> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("song store unavailable");
        }
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory store poisoned"))
    }
}

impl SongStore for MemoryStore {
    fn query(&self, filter: &SongFilter, limit: u32, offset: u64) -> Result<Vec<Song>> {
        let inner = self.lock(&self.reads)?;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(inner
            .songs
            .values()
            .filter(|song| filter.matches(song))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    fn find_text(&self, id: i64) -> Result<Option<String>> {
        let inner = self.lock(&self.reads)?;
        Ok(inner.songs.get(&id).map(|song| song.text.clone()))
    }

    fn insert(
        &self,
        group: &str,
        title: &str,
        release_date: &str,
        text: &str,
        link: &str,
    ) -> Result<i64> {
        let mut inner = self.lock(&self.writes)?;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.songs.insert(
            id,
            Song {
                id,
                group: group.to_string(),
                title: title.to_string(),
                release_date: release_date.to_string(),
                text: text.to_string(),
                link: link.to_string(),
            },
        );
        Ok(id)
    }

    fn update(&self, id: i64, replacement: &SongReplacement) -> Result<usize> {
        let mut inner = self.lock(&self.writes)?;
        match inner.songs.get_mut(&id) {
            Some(song) => {
                song.group = replacement.group.clone();
                song.title = replacement.title.clone();
                song.release_date = replacement.release_date.clone();
                song.text = replacement.text.clone();
                song.link = replacement.link.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete(&self, id: i64) -> Result<usize> {
        let mut inner = self.lock(&self.writes)?;
        Ok(usize::from(inner.songs.remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_monotonically_and_survive_deletes() {
        let store = MemoryStore::new();
        let first = store.insert("A", "One", "", "", "").unwrap();
        let second = store.insert("A", "Two", "", "", "").unwrap();
        assert_eq!(store.delete(second).unwrap(), 1);
        let third = store.insert("A", "Three", "", "", "").unwrap();
        assert_eq!((first, second, third), (1, 2, 3));
        assert_eq!(store.write_count(), 4);
    }

    #[test]
    fn outage_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(store.query(&SongFilter::default(), 10, 0).is_err());
        assert!(store.find_text(1).is_err());
        assert!(store.insert("A", "B", "", "", "").is_err());
        store.set_unavailable(false);
        assert!(store.insert("A", "B", "", "", "").is_ok());
    }
}
