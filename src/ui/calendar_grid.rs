use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::browser::JournalBrowser;

/// Width of one day cell, including the trailing gap.
pub const CELL_WIDTH: usize = 4;
pub const GRID_WIDTH: u16 = (CELL_WIDTH * 7) as u16;

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Pads `text` on the left so it sits centered in `width` columns.
pub fn centered(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width()) / 2;
    format!("{}{text}", " ".repeat(pad))
}

/// Month label, weekday header and one line per week.
pub fn month_lines(browser: &JournalBrowser, accent: Color) -> Vec<Line<'static>> {
    let cursor = browser.cursor;
    let mut lines = vec![
        Line::from(Span::styled(
            centered(&cursor.label(), GRID_WIDTH as usize),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            WEEKDAYS.iter().map(|d| format!("{d:>3} ")).collect::<String>(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    for week in cursor.weeks() {
        let spans = week
            .iter()
            .map(|cell| match cell.and_then(|d| cursor.date(d)) {
                None => Span::raw(" ".repeat(CELL_WIDTH)),
                Some(date) => {
                    let mut style = Style::default();
                    if browser.has_entry(date) {
                        style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                    }
                    if date == browser.today {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    if date == browser.selected {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let marker = if browser.has_entry(date) { "•" } else { " " };
                    Span::styled(format!("{:>3}{marker}", date.format("%-d")), style)
                }
            })
            .collect::<Vec<Span>>();
        lines.push(Line::from(spans));
    }
    lines
}
