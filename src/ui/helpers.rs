use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Song, PLACEHOLDER, VERSE_DELIMITER};

use super::screens::VerseScreen;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

/// Whether a field still holds the creation placeholder (or nothing at all).
pub(crate) fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == PLACEHOLDER
}

/// Two-line list entry: `#id Group - Title`, then date and a lyric preview.
pub(crate) fn song_lines(song: &Song, width: usize) -> Vec<Line<'static>> {
    let heading = Line::from(vec![
        Span::styled(format!("#{:<4} ", song.id), Style::default().fg(Color::DarkGray)),
        Span::styled(
            song.display_title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    let date = if is_unset(&song.release_date) {
        "no date".to_string()
    } else {
        song.release_date.clone()
    };
    let preview = if is_unset(&song.text) {
        "no lyrics yet".to_string()
    } else {
        song.text.split(VERSE_DELIMITER).next().unwrap_or_default().to_string()
    };
    let detail = truncate(&format!("      {date} · {preview}"), width);

    vec![
        heading,
        Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
    ]
}

/// Verses of the current page, numbered by their position in the whole song.
pub(crate) fn verse_lines(screen: &VerseScreen) -> Vec<Line<'static>> {
    if screen.page.verses.is_empty() {
        return vec![Line::from(Span::styled(
            "No verses on this page.",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let first = screen.first_verse_number();
    let mut lines = Vec::with_capacity(screen.page.verses.len() * 2);
    for (offset, verse) in screen.page.verses.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>3}  ", first + offset as u64),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(verse.clone()),
        ]));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Группа крови", 7), "Группа…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn placeholders_count_as_unset() {
        assert!(is_unset(PLACEHOLDER));
        assert!(is_unset("  "));
        assert!(!is_unset("1988"));
    }
}
