use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use doodle_journal::browser::{BrowserAction, JournalBrowser};
use doodle_journal::journal::{parse_date, FeedbackKind, JournalDb, JournalEntry};
use doodle_journal::runtime::{ChannelEventSource, JournalEvent, Runner};
use doodle_journal::{ShapeKind, Stroke};

fn press(code: KeyCode) -> JournalEvent {
    JournalEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn seeded_db() -> JournalDb {
    let db = JournalDb::open_in_memory().unwrap();
    let d = parse_date("2026-11-03").unwrap();
    db.save_entry(
        d,
        &JournalEntry {
            mood_emoji: None,
            summary: "Stroke count: 1".into(),
            reflection: "Curious little line.".into(),
            encouragement: "Keep exploring.".into(),
        },
    )
    .unwrap();
    let line = Stroke::from_coords(&[(0.0, 0.0), (50.0, 1.0), (100.0, 0.0), (150.0, 1.0)]);
    db.save_strokes(d, &vec![line].into()).unwrap();
    db
}

// Drives the browser through Runner/ChannelEventSource without a TTY.
#[test]
fn headless_navigation_and_feedback() {
    let mut browser =
        JournalBrowser::new(seeded_db(), parse_date("2026-10-17").unwrap(), 800.0, 600.0)
            .unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));

    // next month keeps the 17th, then walk back two weeks to the 3rd
    tx.send(press(KeyCode::Char(']'))).unwrap();
    tx.send(press(KeyCode::Up)).unwrap();
    tx.send(press(KeyCode::Up)).unwrap();
    tx.send(press(KeyCode::Char('l'))).unwrap();
    tx.send(JournalEvent::Resize).unwrap();
    tx.send(press(KeyCode::Char('q'))).unwrap();

    let mut ticks = 0;
    let mut quit = false;
    for _ in 0..100u32 {
        match runner.step() {
            JournalEvent::Tick => {
                ticks += 1;
                browser.on_tick();
            }
            JournalEvent::Resize => {}
            JournalEvent::Key(key) => {
                if browser.handle_key(key) == BrowserAction::Quit {
                    quit = true;
                    break;
                }
            }
        }
    }

    assert!(quit, "q should end the loop");
    assert_eq!(ticks, 0, "queued events arrive before any tick");
    assert_eq!(browser.selected, parse_date("2026-11-03").unwrap());
    assert_eq!(browser.cursor.label(), "November 2026");
    assert_eq!(browser.live.metrics.stroke_count, 1);
    assert_eq!(browser.live.shapes[0].kind, ShapeKind::Line);

    let feedback = browser.db().list_feedback().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].kind, FeedbackKind::Like);
}

#[test]
fn headless_idle_loop_only_ticks() {
    let mut browser = JournalBrowser::new(
        JournalDb::open_in_memory().unwrap(),
        parse_date("2026-10-17").unwrap(),
        800.0,
        600.0,
    )
    .unwrap();

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));

    for _ in 0..5u32 {
        assert_eq!(runner.dispatch(&mut browser), BrowserAction::Continue);
    }
    assert!(!browser.live.metrics.has_strokes);
    assert!(browser.live.shapes.is_empty());
}
