pub mod calendar_grid;
pub mod sketch;

use std::str::FromStr;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::browser::JournalBrowser;
use crate::summary::shape_list_lines;
use calendar_grid::{month_lines, GRID_WIDTH};
use sketch::SketchView;

const HELP: &str = "←↑↓→ day  [ ] month  (t)oday  (l)ike (d)islike  (q)uit";

/// Cuts `text` to at most `max` terminal columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn accent_color(browser: &JournalBrowser) -> Color {
    let (primary, _) = browser.tone().palette();
    Color::from_str(primary).unwrap_or(Color::Magenta)
}

fn entry_lines(browser: &JournalBrowser) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(
        browser.selected.format("%A, %B %-d %Y").to_string(),
        bold,
    ))];

    let mood = match (&browser.mood, browser.entry.as_ref().and_then(|e| e.mood_emoji.clone())) {
        (Some(m), _) => format!("Mood: {} {m}", m.emoji()),
        (None, Some(emoji)) => format!("Mood: {emoji}"),
        (None, None) => "Mood: –".to_string(),
    };
    lines.push(Line::from(mood));
    lines.push(Line::default());

    match &browser.entry {
        None => lines.push(Line::from(Span::styled(
            "No journal entry for this day.",
            Style::default().add_modifier(Modifier::DIM),
        ))),
        Some(entry) => {
            if entry.reflection.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No reflection saved.",
                    Style::default().add_modifier(Modifier::DIM),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    entry.reflection.clone(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
            if !entry.encouragement.is_empty() {
                lines.push(Line::from(Span::styled(
                    entry.encouragement.clone(),
                    Style::default().fg(Color::Green),
                )));
            }
            lines.push(Line::default());
            let dim = Style::default().add_modifier(Modifier::DIM);
            lines.extend(
                entry
                    .summary
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), dim))),
            );
        }
    }
    lines
}

fn live_lines(browser: &JournalBrowser, width: usize) -> Vec<Line<'static>> {
    let m = &browser.live.metrics;
    let mut lines = vec![
        Line::from(format!("strokes: {}", m.stroke_count)),
        Line::from(format!("complexity: {}", m.complexity)),
        Line::from(format!("energy: {}", m.energy)),
        Line::from(format!("area: {}", m.dominant_area)),
        Line::from(format!("turns: {}", m.direction_changes)),
        Line::default(),
    ];
    lines.extend(
        shape_list_lines(&browser.live.shapes)
            .iter()
            .map(|l| Line::from(truncate_to_width(l, width))),
    );
    lines
}

impl Widget for &JournalBrowser {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = accent_color(self);
        let panel = |title: &'static str| {
            Block::bordered()
                .title(title)
                .border_style(Style::default().fg(accent))
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1), // status
                Constraint::Length(1), // help
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(GRID_WIDTH + 2), Constraint::Min(1)])
            .split(rows[0]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(1)])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        Paragraph::new(month_lines(self, accent))
            .block(panel(" calendar "))
            .render(left[0], buf);

        let inner_width = left[1].width.saturating_sub(2) as usize;
        Paragraph::new(live_lines(self, inner_width))
            .block(panel(" doodle "))
            .render(left[1], buf);

        Paragraph::new(entry_lines(self))
            .block(panel(" journal "))
            .wrap(Wrap { trim: true })
            .render(right[0], buf);

        SketchView {
            session: &self.sketch,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            block: panel(" sketch "),
        }
        .render(right[1], buf);

        if let Some(status) = &self.status {
            Paragraph::new(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            ))
            .render(rows[1], buf);
        }

        Paragraph::new(Span::styled(
            HELP,
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
        .render(rows[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{parse_date, JournalDb, JournalEntry};
    use crate::mood::Mood;
    use crate::shapes::fixtures::polygon;

    fn browser_with_entry() -> JournalBrowser {
        let db = JournalDb::open_in_memory().unwrap();
        let d = parse_date("2026-10-17").unwrap();
        db.save_entry(
            d,
            &JournalEntry {
                mood_emoji: Some("😌".into()),
                summary: "Stroke count: 1".into(),
                reflection: "A gentle loop.".into(),
                encouragement: "Nice.".into(),
            },
        )
        .unwrap();
        db.save_mood(d, Mood::Calm).unwrap();
        db.save_strokes(
            d,
            &vec![polygon(400.0, 300.0, 80.0, 16).with_color("#ff0000")].into(),
        )
        .unwrap();
        JournalBrowser::new(db, d, 800.0, 600.0).unwrap()
    }

    fn rows_of(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_to_width("1. circle-like – red", 10), "1. circle…");
        assert_eq!(truncate_to_width("😊😊😊", 4), "😊…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_browser_widget_renders_panels() {
        let browser = browser_with_entry();
        let area = Rect::new(0, 0, 100, 30);
        let mut buffer = Buffer::empty(area);
        (&browser).render(area, &mut buffer);

        let text = rows_of(&buffer).join("\n");
        assert!(text.contains("October 2026"));
        assert!(text.contains(" Su  Mo  Tu  We  Th  Fr  Sa "));
        assert!(text.contains("A gentle loop."));
        assert!(text.contains("Nice."));
        assert!(text.contains("strokes: 1"));
        assert!(text.contains("1. circle-like"));
        assert!(text.contains("(q)uit"));
    }

    #[test]
    fn test_empty_day_renders_placeholder() {
        let mut browser = browser_with_entry();
        browser.move_days(1).unwrap();
        let area = Rect::new(0, 0, 100, 30);
        let mut buffer = Buffer::empty(area);
        (&browser).render(area, &mut buffer);

        let text = rows_of(&buffer).join("\n");
        assert!(text.contains("No journal entry for this day."));
        assert!(text.contains("No shapes confidently"));
    }

    #[test]
    fn test_status_line_shown() {
        let mut browser = browser_with_entry();
        browser.status = Some("Thanks!".into());
        let area = Rect::new(0, 0, 100, 30);
        let mut buffer = Buffer::empty(area);
        (&browser).render(area, &mut buffer);
        assert!(rows_of(&buffer)[28].starts_with("Thanks!"));
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let browser = browser_with_entry();
        for (w, h) in [(1, 1), (10, 3), (30, 10)] {
            let area = Rect::new(0, 0, w, h);
            let mut buffer = Buffer::empty(area);
            (&browser).render(area, &mut buffer);
        }
    }
}
