use crate::models::{Song, SongFilter, VersePage};
use crate::paging::Pagination;

/// One page of search results plus the filter and window that produced it.
pub(crate) struct ResultsScreen {
    pub(crate) songs: Vec<Song>,
    pub(crate) filter: SongFilter,
    pub(crate) page: Pagination,
    pub(crate) selected: usize,
}

impl ResultsScreen {
    pub(crate) fn new(page: Pagination) -> Self {
        Self {
            songs: Vec::new(),
            filter: SongFilter::default(),
            page,
            selected: 0,
        }
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.songs.get(self.selected)
    }

    /// Replace the visible rows, keeping the selection on the same song id
    /// when it is still present.
    pub(crate) fn set_songs(&mut self, songs: Vec<Song>) {
        let focus = self.current_song().map(|song| song.id);
        self.songs = songs;
        self.selected = focus
            .and_then(|id| self.songs.iter().position(|song| song.id == id))
            .unwrap_or(0);
        self.ensure_in_bounds();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.songs.is_empty() {
            return;
        }
        let len = self.songs.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        if !self.songs.is_empty() {
            self.selected = self.songs.len() - 1;
        }
    }

    /// Human-readable summary of the active predicates.
    pub(crate) fn filter_summary(&self) -> String {
        let filter = &self.filter;
        let mut parts = Vec::new();
        if let Some(id) = filter.id {
            parts.push(format!("id={id}"));
        }
        let text_fields = [
            ("group", &filter.group),
            ("song", &filter.title),
            ("date", &filter.release_date),
            ("text", &filter.text),
            ("link", &filter.link),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                parts.push(format!("{name}~\"{value}\""));
            }
        }
        if parts.is_empty() {
            "all songs".to_string()
        } else {
            parts.join(", ")
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.songs.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.songs.len() {
            self.selected = self.songs.len() - 1;
        }
    }
}

/// Verse reader for a single song.
pub(crate) struct VerseScreen {
    pub(crate) song: Song,
    pub(crate) page: VersePage,
}

impl VerseScreen {
    /// Total number of verse pages, at least one so an empty song still
    /// renders as "page 1 of 1".
    pub(crate) fn page_count(&self) -> u64 {
        let size = self.page.page_size.max(1);
        self.page.total_count.div_ceil(size).max(1)
    }

    pub(crate) fn has_next(&self) -> bool {
        self.page.page < self.page_count()
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.page.page > 1
    }

    /// 1-based index of the first verse on this page.
    pub(crate) fn first_verse_number(&self) -> u64 {
        (self.page.page - 1) * self.page.page_size + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64) -> Song {
        Song {
            id,
            group: "G".to_string(),
            title: format!("T{id}"),
            release_date: String::new(),
            text: String::new(),
            link: String::new(),
        }
    }

    #[test]
    fn selection_follows_the_song_across_reloads() {
        let mut screen = ResultsScreen::new(Pagination::default());
        screen.set_songs(vec![song(1), song(2), song(3)]);
        screen.move_selection(2);
        assert_eq!(screen.current_song().unwrap().id, 3);

        screen.set_songs(vec![song(3), song(4)]);
        assert_eq!(screen.current_song().unwrap().id, 3);

        screen.set_songs(vec![song(9)]);
        assert_eq!(screen.selected, 0);

        screen.set_songs(Vec::new());
        assert!(screen.current_song().is_none());
        screen.move_selection(1);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn filter_summary_lists_active_predicates() {
        let mut screen = ResultsScreen::new(Pagination::default());
        assert_eq!(screen.filter_summary(), "all songs");
        screen.filter = SongFilter {
            id: Some(4),
            group: Some("muse".to_string()),
            ..SongFilter::default()
        };
        assert_eq!(screen.filter_summary(), "id=4, group~\"muse\"");
    }

    #[test]
    fn verse_page_navigation_bounds() {
        let screen = VerseScreen {
            song: song(1),
            page: VersePage {
                song_id: 1,
                verses: vec!["c".to_string()],
                page: 2,
                page_size: 2,
                total_count: 3,
            },
        };
        assert_eq!(screen.page_count(), 2);
        assert!(!screen.has_next());
        assert!(screen.has_previous());
        assert_eq!(screen.first_verse_number(), 3);
    }
}
