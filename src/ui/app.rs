use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::SongCatalog;
use crate::db::SharedStore;
use crate::models::Song;
use crate::paging::Pagination;
use crate::query::FilterQueryEngine;
use crate::verses::{VersePaginator, VerseRequest};

use super::forms::{ConfirmSongDelete, FormKind, SongForm};
use super::helpers::{centered_rect, is_unset, song_lines, verse_lines};
use super::screens::{ResultsScreen, VerseScreen};

/// Rows fetched per result page.
const RESULTS_PAGE_SIZE: u32 = 20;
/// Verses shown per page in the reader.
const VERSES_PER_PAGE: u32 = 8;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

enum Screen {
    Results,
    Verses(VerseScreen),
}

enum Mode {
    Normal,
    Filtering(SongForm),
    CreatingSong(SongForm),
    EditingSong { song_id: i64, form: SongForm },
    ConfirmSongDelete(ConfirmSongDelete),
}

/// Outcome of a keystroke inside a form dialog.
enum FormAction {
    Continue,
    Cancel,
    Submit,
}

struct StatusMessage {
    text: String,
    kind: StatusKind,
}

enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal browser state. Talks to the store only through the same
/// components the HTTP server uses.
pub struct App {
    search: FilterQueryEngine,
    verses: VersePaginator,
    catalog: SongCatalog,
    results: ResultsScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: SharedStore, max_limit: u32) -> Self {
        let search = FilterQueryEngine::with_max_limit(store.clone(), max_limit);
        // Page by what the engine will actually return.
        let page = Pagination {
            limit: RESULTS_PAGE_SIZE,
            offset: 0,
        }
        .capped(search.max_limit());
        let mut app = Self {
            search,
            verses: VersePaginator::new(store.clone()),
            catalog: SongCatalog::new(store),
            results: ResultsScreen::new(page),
            screen: Screen::Results,
            mode: Mode::Normal,
            status: None,
        };
        app.reload_results();
        app
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Filtering(form) => self.handle_filter_form(code, form),
            Mode::CreatingSong(form) => self.handle_create_song(code, form),
            Mode::EditingSong { song_id, form } => self.handle_edit_song(code, song_id, form),
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Results => self.handle_results_key(code, exit),
            Screen::Verses(_) => self.handle_verses_key(code, exit),
        }
    }

    fn handle_results_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.results.move_selection(-1),
            KeyCode::Down => self.results.move_selection(1),
            KeyCode::PageUp => self.results.move_selection(-5),
            KeyCode::PageDown => self.results.move_selection(5),
            KeyCode::Home => self.results.select_first(),
            KeyCode::End => self.results.select_last(),
            KeyCode::Enter => {
                if let Some(song) = self.results.current_song().cloned() {
                    self.open_verses(song, 1);
                } else {
                    self.set_status("No song selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('f') => {
                self.clear_status();
                return Mode::Filtering(SongForm::filter(&self.results.filter));
            }
            KeyCode::Char('c') => {
                self.results.filter = Default::default();
                self.results.page.offset = 0;
                self.reload_results();
                self.set_status("Filter cleared.", StatusKind::Info);
            }
            KeyCode::Char('n') => {
                if self.results.songs.len() < self.results.page.limit as usize {
                    self.set_status("Already on the last page.", StatusKind::Info);
                } else {
                    self.results.page = self.results.page.next();
                    self.reload_results();
                }
            }
            KeyCode::Char('p') => {
                if self.results.page.offset == 0 {
                    self.set_status("Already on the first page.", StatusKind::Info);
                } else {
                    self.results.page = self.results.page.previous();
                    self.reload_results();
                }
            }
            KeyCode::Char('r') => {
                self.reload_results();
                self.set_status("Results refreshed.", StatusKind::Info);
            }
            KeyCode::Char('o') => {
                if let Some(song) = self.results.current_song().cloned() {
                    self.open_song_link(&song);
                }
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Mode::CreatingSong(SongForm::create());
            }
            KeyCode::Char('e') => {
                if let Some(song) = self.results.current_song() {
                    let mode = Mode::EditingSong {
                        song_id: song.id,
                        form: SongForm::edit(song),
                    };
                    self.clear_status();
                    return mode;
                }
                self.set_status("No song selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                if let Some(song) = self.results.current_song().cloned() {
                    self.clear_status();
                    return Mode::ConfirmSongDelete(ConfirmSongDelete { song });
                }
                self.set_status("No song selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_verses_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let Screen::Verses(reader) = &self.screen else {
            return Mode::Normal;
        };
        let song = reader.song.clone();
        let page = reader.page.page;
        let has_next = reader.has_next();
        let has_previous = reader.has_previous();

        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.screen = Screen::Results;
                self.clear_status();
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                if has_next {
                    self.open_verses(song, page + 1);
                } else {
                    self.set_status("Last verse page.", StatusKind::Info);
                }
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                if has_previous {
                    self.open_verses(song, page - 1);
                } else {
                    self.set_status("First verse page.", StatusKind::Info);
                }
            }
            KeyCode::Char('o') => self.open_song_link(&song),
            KeyCode::Char('e') => {
                self.clear_status();
                return Mode::EditingSong {
                    song_id: song.id,
                    form: SongForm::edit(&song),
                };
            }
            _ => {}
        }
        Mode::Normal
    }

    fn apply_form_key(code: KeyCode, form: &mut SongForm) -> FormAction {
        match code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Delete if form.kind == FormKind::Filter => form.clear(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    fn handle_filter_form(&mut self, code: KeyCode, mut form: SongForm) -> Mode {
        match Self::apply_form_key(code, &mut form) {
            FormAction::Continue => Mode::Filtering(form),
            FormAction::Cancel => Mode::Normal,
            FormAction::Submit => match form.to_filter() {
                Ok(filter) => {
                    self.results.filter = filter;
                    self.results.page.offset = 0;
                    self.reload_results();
                    Mode::Normal
                }
                Err(err) => {
                    form.error = Some(err.to_string());
                    Mode::Filtering(form)
                }
            },
        }
    }

    fn handle_create_song(&mut self, code: KeyCode, mut form: SongForm) -> Mode {
        match Self::apply_form_key(code, &mut form) {
            FormAction::Continue => Mode::CreatingSong(form),
            FormAction::Cancel => {
                self.set_status("Creation cancelled.", StatusKind::Info);
                Mode::Normal
            }
            FormAction::Submit => match self.catalog.create(&form.to_create()) {
                Ok(song) => {
                    self.reload_results();
                    self.set_status(format!("Created {song}."), StatusKind::Info);
                    Mode::Normal
                }
                Err(err) => {
                    form.error = Some(err.to_string());
                    Mode::CreatingSong(form)
                }
            },
        }
    }

    fn handle_edit_song(&mut self, code: KeyCode, song_id: i64, mut form: SongForm) -> Mode {
        match Self::apply_form_key(code, &mut form) {
            FormAction::Continue => Mode::EditingSong { song_id, form },
            FormAction::Cancel => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                Mode::Normal
            }
            FormAction::Submit => match self.catalog.replace(song_id, &form.to_replacement()) {
                Ok(()) => {
                    self.reload_results();
                    self.refresh_reader(song_id);
                    self.set_status("Song updated.", StatusKind::Info);
                    Mode::Normal
                }
                Err(err) => {
                    form.error = Some(err.to_string());
                    Mode::EditingSong { song_id, form }
                }
            },
        }
    }

    fn handle_confirm_song_delete(&mut self, code: KeyCode, confirm: ConfirmSongDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.catalog.delete(confirm.song.id) {
                    Ok(()) => {
                        if matches!(&self.screen, Screen::Verses(reader) if reader.song.id == confirm.song.id)
                        {
                            self.screen = Screen::Results;
                        }
                        self.reload_results();
                        self.set_status("Song deleted.", StatusKind::Info);
                        Mode::Normal
                    }
                    Err(err) => {
                        self.set_status(err.to_string(), StatusKind::Error);
                        Mode::ConfirmSongDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmSongDelete(confirm),
        }
    }

    fn reload_results(&mut self) {
        match self.search.run(&self.results.filter, self.results.page) {
            Ok(songs) => self.results.set_songs(songs),
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    fn open_verses(&mut self, song: Song, page: u64) {
        let request = VerseRequest::new(song.id, page, VERSES_PER_PAGE);
        match self.verses.get_verse_page(request) {
            Ok(page) => {
                self.clear_status();
                self.screen = Screen::Verses(VerseScreen { song, page });
            }
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    /// Re-fetch the reader after its song changed underneath it.
    fn refresh_reader(&mut self, song_id: i64) {
        let Screen::Verses(reader) = &self.screen else {
            return;
        };
        if reader.song.id != song_id {
            return;
        }
        let song = self
            .results
            .songs
            .iter()
            .find(|song| song.id == song_id)
            .cloned()
            .unwrap_or_else(|| reader.song.clone());
        self.open_verses(song, 1);
    }

    fn open_song_link(&mut self, song: &Song) {
        let link = song.link.trim();
        if is_unset(link) {
            self.set_status("This song does not have a link.", StatusKind::Error);
        } else if let Err(err) = open_link(link) {
            self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened {}.", song.display_title()), StatusKind::Info);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Results => self.draw_results(frame, content_area),
            Screen::Verses(reader) => self.draw_verses(frame, content_area, reader),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Filtering(form) | Mode::CreatingSong(form) => self.draw_form(frame, area, form),
            Mode::EditingSong { form, .. } => self.draw_form(frame, area, form),
            Mode::ConfirmSongDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let page = self.results.page;
        let range = if self.results.songs.is_empty() {
            "no rows".to_string()
        } else {
            format!(
                "rows {}-{}",
                page.offset + 1,
                page.offset + self.results.songs.len() as u64
            )
        };
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Filter: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(self.results.filter_summary()),
            ]),
            Line::from(Span::styled(range, Style::default().fg(Color::Gray))),
        ])
        .block(Block::default().borders(Borders::ALL).title("Song Catalog"));
        frame.render_widget(header, chunks[0]);

        if self.results.songs.is_empty() {
            let message = Paragraph::new("No songs match. Press 'f' to change the filter or '+' to add one.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let width = chunks[1].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .results
            .songs
            .iter()
            .map(|song| ListItem::new(song_lines(song, width)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(self.results.selected));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_verses(&self, frame: &mut Frame, area: Rect, reader: &VerseScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                reader.song.display_title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "Page {} of {}  ·  {} verses",
                    reader.page.page,
                    reader.page_count(),
                    reader.page.total_count
                ),
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title("Verses"));
        frame.render_widget(header, chunks[0]);

        let body = Paragraph::new(verse_lines(reader))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Filtering(_)) => &[
                ("[Tab]", " Next field   "),
                ("[Del]", " Clear all   "),
                ("[Enter]", " Apply   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::CreatingSong(_) | Mode::EditingSong { .. }) => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::ConfirmSongDelete(_)) => &[("[Y]", " Delete   "), ("[N]", " Keep")],
            (Screen::Results, Mode::Normal) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Verses   "),
                ("[f]", " Filter   "),
                ("[c]", " Clear   "),
                ("[n/p]", " Page   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[o]", " Open link   "),
                ("[q]", " Quit"),
            ],
            (Screen::Verses(_), Mode::Normal) => &[
                ("[←→]", " Page   "),
                ("[e]", " Edit   "),
                ("[o]", " Open link   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &SongForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = form
            .fields()
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else if form.kind == FormKind::Edit {
            lines.push(Line::from(Span::styled(
                "Separate verses with a literal \\n.",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset().min(inner.width.saturating_sub(1) as usize) as u16;
        let cursor_y = inner.y + form.active_index() as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Song").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete {} permanently?", confirm.song)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{MemoryStore, SongStore};

    fn app_with(count: usize) -> (Arc<MemoryStore>, App) {
        let store = Arc::new(MemoryStore::new());
        for n in 1..=count {
            store
                .insert("Band", &format!("Song {n}"), "", "a\\nb\\nc", "")
                .unwrap();
        }
        let app = App::new(store.clone(), 100);
        (store, app)
    }

    fn type_keys(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn loads_the_first_page_on_start() {
        let (_, app) = app_with(25);
        assert_eq!(app.results.songs.len(), RESULTS_PAGE_SIZE as usize);
        assert_eq!(app.results.songs[0].id, 1);
    }

    #[test]
    fn next_and_previous_pages() {
        let (_, mut app) = app_with(25);
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.results.songs.len(), 5);
        assert_eq!(app.results.songs[0].id, 21);

        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.results.page.offset, 20);

        app.handle_key(KeyCode::Char('p')).unwrap();
        assert_eq!(app.results.songs[0].id, 1);
    }

    #[test]
    fn small_limit_ceiling_still_pages_through_everything() {
        let store = Arc::new(MemoryStore::new());
        for n in 1..=25 {
            store.insert("Band", &format!("Song {n}"), "", "", "").unwrap();
        }
        let mut app = App::new(store, 5);
        assert_eq!(app.results.songs.len(), 5);

        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.results.page.offset, 5);
        assert_eq!(app.results.songs[0].id, 6);

        app.handle_key(KeyCode::Char('p')).unwrap();
        assert_eq!(app.results.songs[0].id, 1);
    }

    #[test]
    fn edit_accepts_a_whole_record_replacement() {
        let (store, mut app) = app_with(1);
        app.handle_key(KeyCode::Char('e')).unwrap();
        for _ in 0.."Band".len() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.results.songs[0].group, "");
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn filter_dialog_narrows_results() {
        let (_, mut app) = app_with(12);
        app.handle_key(KeyCode::Char('f')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_keys(&mut app, "song 1");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        // Song 1, Song 10, Song 11, Song 12
        assert_eq!(app.results.songs.len(), 4);

        app.handle_key(KeyCode::Char('c')).unwrap();
        assert_eq!(app.results.songs.len(), 12);
    }

    #[test]
    fn enter_opens_the_verse_reader() {
        let (_, mut app) = app_with(1);
        app.handle_key(KeyCode::Enter).unwrap();
        let Screen::Verses(reader) = &app.screen else {
            panic!("expected verse reader");
        };
        assert_eq!(reader.page.verses, vec!["a", "b", "c"]);
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(matches!(app.screen, Screen::Results));
    }

    #[test]
    fn create_edit_and_delete_through_dialogs() {
        let (store, mut app) = app_with(0);
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_keys(&mut app, "Muse");
        app.handle_key(KeyCode::Tab).unwrap();
        type_keys(&mut app, "Uprising");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.results.songs.len(), 1);
        assert_eq!(app.results.songs[0].text, crate::models::PLACEHOLDER);

        app.handle_key(KeyCode::Char('e')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        type_keys(&mut app, " Live");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.results.songs[0].title, "Uprising Live");

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.results.songs.is_empty());
        assert_eq!(store.write_count(), 3);
    }

    #[test]
    fn invalid_create_keeps_the_dialog_open() {
        let (store, mut app) = app_with(0);
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_keys(&mut app, "Only group");
        app.handle_key(KeyCode::Enter).unwrap();
        let Mode::CreatingSong(form) = &app.mode else {
            panic!("dialog should stay open");
        };
        assert!(form.error.is_some());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn quit_keys_exit() {
        let (_, mut app) = app_with(0);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
