use chrono::{Datelike, Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::calendar::MonthCursor;
use crate::error::JournalResult;
use crate::features::{compute_metrics, Metrics};
use crate::journal::{FeedbackKind, JournalDb, JournalEntry};
use crate::mood::{Mood, MoodTone};
use crate::shapes::{detect_shapes, Shape};
use crate::stroke::DrawingSession;

/// Metrics and shapes of the sketch on screen, recomputed on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveAnalysis {
    pub metrics: Metrics,
    pub shapes: Vec<Shape>,
}

impl LiveAnalysis {
    pub fn compute(snapshot: &DrawingSession, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            metrics: compute_metrics(snapshot, canvas_width, canvas_height),
            shapes: detect_shapes(snapshot),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAction {
    Continue,
    Quit,
}

/// State of the terminal journal browser
#[derive(Debug)]
pub struct JournalBrowser {
    db: JournalDb,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub today: NaiveDate,
    pub cursor: MonthCursor,
    pub selected: NaiveDate,
    /// Days of the shown month that have an entry.
    pub marked: Vec<NaiveDate>,
    pub entry: Option<JournalEntry>,
    pub mood: Option<Mood>,
    pub sketch: DrawingSession,
    pub live: LiveAnalysis,
    pub status: Option<String>,
}

impl JournalBrowser {
    pub fn new(
        db: JournalDb,
        today: NaiveDate,
        canvas_width: f64,
        canvas_height: f64,
    ) -> JournalResult<Self> {
        let sketch = DrawingSession::new();
        let mut browser = Self {
            db,
            canvas_width,
            canvas_height,
            today,
            cursor: MonthCursor::containing(today),
            selected: today,
            marked: Vec::new(),
            entry: None,
            mood: None,
            live: LiveAnalysis::compute(&sketch, canvas_width, canvas_height),
            sketch,
            status: None,
        };
        browser.refresh_month()?;
        browser.select(today)?;
        Ok(browser)
    }

    /// Opens on the local date.
    pub fn open_today(db: JournalDb, canvas_width: f64, canvas_height: f64) -> JournalResult<Self> {
        Self::new(db, Local::now().date_naive(), canvas_width, canvas_height)
    }

    pub fn db(&self) -> &JournalDb {
        &self.db
    }

    fn refresh_month(&mut self) -> JournalResult<()> {
        self.marked = self
            .db
            .entry_dates_in_month(self.cursor.year(), self.cursor.month())?;
        Ok(())
    }

    /// Show `date`, moving the month if needed, and reload its data.
    pub fn select(&mut self, date: NaiveDate) -> JournalResult<()> {
        self.selected = date;
        if !self.cursor.contains(date) {
            self.cursor = MonthCursor::containing(date);
            self.refresh_month()?;
        }
        self.entry = self.db.load_entry(date)?;
        self.mood = self.db.load_mood(date)?;
        self.sketch = self.db.load_strokes(date)?.unwrap_or_default();
        self.on_tick();
        Ok(())
    }

    pub fn move_days(&mut self, delta: i64) -> JournalResult<()> {
        let target = if delta >= 0 {
            self.selected.checked_add_days(Days::new(delta as u64))
        } else {
            self.selected.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        match target {
            Some(date) => self.select(date),
            None => Ok(()),
        }
    }

    /// Switch month, keeping the day of month where it exists.
    pub fn shift_month(&mut self, forward: bool) -> JournalResult<()> {
        let month = if forward {
            self.cursor.next()
        } else {
            self.cursor.prev()
        };
        let date = month
            .date(self.selected.day().min(month.days_in_month()))
            .unwrap_or_else(|| month.first_day());
        self.cursor = month;
        self.refresh_month()?;
        self.select(date)
    }

    pub fn jump_to_today(&mut self) -> JournalResult<()> {
        self.select(self.today)
    }

    /// Rate the selected day's reflection. Days without one are skipped.
    pub fn record_feedback(&mut self, kind: FeedbackKind) -> JournalResult<()> {
        let reflection = self
            .entry
            .as_ref()
            .map(|e| e.reflection.as_str())
            .filter(|r| !r.trim().is_empty());
        match reflection {
            Some(text) => {
                self.db.record_feedback(kind, text)?;
                self.status = Some(format!("Thanks! Saved {kind} for {}.", self.selected));
            }
            None => {
                self.status = Some("No reflection to rate on this day.".to_string());
            }
        }
        Ok(())
    }

    pub fn on_tick(&mut self) {
        self.live = LiveAnalysis::compute(&self.sketch, self.canvas_width, self.canvas_height);
    }

    pub fn tone(&self) -> MoodTone {
        self.entry
            .as_ref()
            .map(|e| MoodTone::from_reflection(&e.reflection))
            .unwrap_or(MoodTone::Default)
    }

    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.marked.contains(&date)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> BrowserAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return BrowserAction::Quit;
        }

        let result = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return BrowserAction::Quit,
            KeyCode::Left => self.move_days(-1),
            KeyCode::Right => self.move_days(1),
            KeyCode::Up => self.move_days(-7),
            KeyCode::Down => self.move_days(7),
            KeyCode::Char('[') => self.shift_month(false),
            KeyCode::Char(']') => self.shift_month(true),
            KeyCode::Char('t') => self.jump_to_today(),
            KeyCode::Char('l') => self.record_feedback(FeedbackKind::Like),
            KeyCode::Char('d') => self.record_feedback(FeedbackKind::Dislike),
            _ => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!("journal browser action failed: {e}");
            self.status = Some(format!("Error: {e}"));
        }
        BrowserAction::Continue
    }
}
