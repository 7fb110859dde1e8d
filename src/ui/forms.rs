use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::catalog::CreateSong;
use crate::error::CatalogResult;
use crate::models::{Song, SongFilter, SongReplacement};
use crate::query::SearchParams;

/// Every editable column of a song, plus the id for filtering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SongField {
    Id = 0,
    Group = 1,
    Title = 2,
    ReleaseDate = 3,
    Text = 4,
    Link = 5,
}

const FIELD_COUNT: usize = 6;

const FILTER_FIELDS: &[SongField] = &[
    SongField::Group,
    SongField::Title,
    SongField::ReleaseDate,
    SongField::Text,
    SongField::Link,
    SongField::Id,
];
const CREATE_FIELDS: &[SongField] = &[SongField::Group, SongField::Title];
const EDIT_FIELDS: &[SongField] = &[
    SongField::Group,
    SongField::Title,
    SongField::ReleaseDate,
    SongField::Text,
    SongField::Link,
];

impl SongField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SongField::Id => "Id",
            SongField::Group => "Group",
            SongField::Title => "Song",
            SongField::ReleaseDate => "Release date",
            SongField::Text => "Text",
            SongField::Link => "Link",
        }
    }
}

/// What the form is for; decides which fields show up and what is required.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormKind {
    Filter,
    Create,
    Edit,
}

/// Single-line field editor shared by the filter, create, and edit dialogs.
/// Verse breaks in the text field are typed as a literal `\n`.
#[derive(Clone)]
pub(crate) struct SongForm {
    pub(crate) kind: FormKind,
    values: [String; FIELD_COUNT],
    active: usize,
    pub(crate) error: Option<String>,
}

impl SongForm {
    /// Filter dialog pre-filled with the filter currently applied.
    pub(crate) fn filter(current: &SongFilter) -> Self {
        let mut form = Self::empty(FormKind::Filter);
        form.set(SongField::Id, current.id.map(|id| id.to_string()).unwrap_or_default());
        form.set(SongField::Group, current.group.clone().unwrap_or_default());
        form.set(SongField::Title, current.title.clone().unwrap_or_default());
        form.set(
            SongField::ReleaseDate,
            current.release_date.clone().unwrap_or_default(),
        );
        form.set(SongField::Text, current.text.clone().unwrap_or_default());
        form.set(SongField::Link, current.link.clone().unwrap_or_default());
        form
    }

    pub(crate) fn create() -> Self {
        Self::empty(FormKind::Create)
    }

    /// Edit dialog populated from an existing song.
    pub(crate) fn edit(song: &Song) -> Self {
        let mut form = Self::empty(FormKind::Edit);
        form.set(SongField::Group, song.group.clone());
        form.set(SongField::Title, song.title.clone());
        form.set(SongField::ReleaseDate, song.release_date.clone());
        form.set(SongField::Text, song.text.clone());
        form.set(SongField::Link, song.link.clone());
        form
    }

    fn empty(kind: FormKind) -> Self {
        Self {
            kind,
            values: Default::default(),
            active: 0,
            error: None,
        }
    }

    pub(crate) fn fields(&self) -> &'static [SongField] {
        match self.kind {
            FormKind::Filter => FILTER_FIELDS,
            FormKind::Create => CREATE_FIELDS,
            FormKind::Edit => EDIT_FIELDS,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Filter => "Filter Songs",
            FormKind::Create => "Create Song",
            FormKind::Edit => "Edit Song",
        }
    }

    pub(crate) fn active_field(&self) -> SongField {
        self.fields()[self.active]
    }

    /// Row of the active field inside the dialog.
    pub(crate) fn active_index(&self) -> usize {
        self.active
    }

    pub(crate) fn value(&self, field: SongField) -> &str {
        &self.values[field as usize]
    }

    fn set(&mut self, field: SongField, value: String) {
        self.values[field as usize] = value;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % self.fields().len();
    }

    pub(crate) fn previous_field(&mut self) {
        let len = self.fields().len();
        self.active = (self.active + len - 1) % len;
    }

    /// Append to the active field. The id filter only accepts digits.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active_field();
        if field == SongField::Id && !ch.is_ascii_digit() {
            return false;
        }
        self.values[field as usize].push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active_field();
        self.values[field as usize].pop();
    }

    /// Wipe every field, used by the filter dialog's reset shortcut.
    pub(crate) fn clear(&mut self) {
        self.values = Default::default();
        self.error = None;
    }

    /// Translate the filter dialog into a predicate set using the same rules
    /// as the HTTP query parameters.
    pub(crate) fn to_filter(&self) -> CatalogResult<SongFilter> {
        let raw = |field: SongField| Some(self.value(field).to_string());
        SearchParams {
            id: raw(SongField::Id),
            group: raw(SongField::Group),
            title: raw(SongField::Title),
            release_date: raw(SongField::ReleaseDate),
            release_date_alt: None,
            text: raw(SongField::Text),
            link: raw(SongField::Link),
            limit: None,
            offset: None,
        }
        .filter()
    }

    pub(crate) fn to_create(&self) -> CreateSong {
        CreateSong {
            group: Some(self.value(SongField::Group).to_string()),
            title: Some(self.value(SongField::Title).to_string()),
        }
    }

    pub(crate) fn to_replacement(&self) -> SongReplacement {
        SongReplacement {
            group: self.value(SongField::Group).trim().to_string(),
            title: self.value(SongField::Title).trim().to_string(),
            release_date: self.value(SongField::ReleaseDate).trim().to_string(),
            text: self.value(SongField::Text).to_string(),
            link: self.value(SongField::Link).trim().to_string(),
        }
    }

    fn placeholder(&self, field: SongField) -> &'static str {
        match (self.kind, field) {
            (FormKind::Filter, _) => "<any>",
            (_, SongField::Group | SongField::Title) => "<required>",
            _ => "<optional>",
        }
    }

    /// Render one styled `Label: value` line.
    pub(crate) fn build_line(&self, field: SongField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active_field() == field;

        let display = if value.is_empty() {
            self.placeholder(field).to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the active field, relative to the dialog.
    pub(crate) fn cursor_offset(&self) -> usize {
        let field = self.active_field();
        field.label().len() + 2 + self.value(field).chars().count()
    }
}

/// State for confirming permanent song deletion.
pub(crate) struct ConfirmSongDelete {
    pub(crate) song: Song,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    fn type_str(form: &mut SongForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn filter_form_round_trips_the_current_filter() {
        let current = SongFilter {
            id: Some(7),
            group: Some("Muse".to_string()),
            ..SongFilter::default()
        };
        let form = SongForm::filter(&current);
        assert_eq!(form.to_filter().unwrap(), current);
    }

    #[test]
    fn id_field_only_takes_digits() {
        let mut form = SongForm::filter(&SongFilter::default());
        while form.active_field() != SongField::Id {
            form.next_field();
        }
        type_str(&mut form, "1a2");
        assert_eq!(form.value(SongField::Id), "12");
        assert_eq!(form.to_filter().unwrap().id, Some(12));
    }

    #[test]
    fn cleared_filter_is_unconstrained() {
        let mut form = SongForm::filter(&SongFilter {
            text: Some("love".to_string()),
            ..SongFilter::default()
        });
        form.clear();
        assert!(form.to_filter().unwrap().is_unconstrained());
    }

    #[test]
    fn field_focus_wraps_both_ways() {
        let mut form = SongForm::create();
        assert_eq!(form.active_field(), SongField::Group);
        form.previous_field();
        assert_eq!(form.active_field(), SongField::Title);
        form.next_field();
        assert_eq!(form.active_field(), SongField::Group);
    }

    #[test]
    fn create_form_feeds_catalog_validation() {
        let mut form = SongForm::create();
        type_str(&mut form, "Muse");
        let err = form.to_create().validate().unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        form.next_field();
        type_str(&mut form, "Madness");
        let song = form.to_create().validate().unwrap();
        assert_eq!(song.title, "Madness");
    }

    #[test]
    fn edit_form_keeps_verse_delimiters() {
        let song = Song {
            id: 3,
            group: "Muse".to_string(),
            title: "Madness".to_string(),
            release_date: "2012".to_string(),
            text: "I can't get it right\\nGet it right".to_string(),
            link: String::new(),
        };
        let form = SongForm::edit(&song);
        let replacement = form.to_replacement();
        assert_eq!(replacement.text, song.text);
        assert_eq!(replacement.release_date, "2012");
    }
}
