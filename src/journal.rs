use chrono::{DateTime, Datelike, Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::{JournalError, JournalResult};
use crate::mood::Mood;
use crate::reflection::{Reflection, Reflector};
use crate::stroke::DrawingSession;
use crate::summary::summarize_doodle;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const FEEDBACK_EXCERPT_CHARS: usize = 200;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS journal_entries (
        date TEXT PRIMARY KEY,
        mood_emoji TEXT,
        summary TEXT NOT NULL,
        reflection TEXT NOT NULL,
        encouragement TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS moods (
        date TEXT PRIMARY KEY,
        mood TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS sketches (
        date TEXT PRIMARY KEY,
        strokes_json TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        reflection_excerpt TEXT NOT NULL
    );
"#;

/// Parse a `YYYY-MM-DD` key.
pub fn parse_date(s: &str) -> JournalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| JournalError::InvalidDate(s.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// What gets written for one day when a doodle is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub mood_emoji: Option<String>,
    pub summary: String,
    pub reflection: String,
    pub encouragement: String,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedbackKind {
    Like,
    Dislike,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub timestamp: DateTime<Local>,
    pub reflection_excerpt: String,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: &'a str,
    mood_emoji: &'a str,
    summary: &'a str,
    reflection: &'a str,
    encouragement: &'a str,
    updated_at: &'a str,
}

/// Date-keyed store for entries, moods, sketches and feedback.
#[derive(Debug)]
pub struct JournalDb {
    conn: Connection,
}

impl JournalDb {
    /// Open (or create) the database file, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> JournalResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened journal database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> JournalResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> JournalResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(JournalDb { conn })
    }

    pub fn save_entry(&self, date: NaiveDate, entry: &JournalEntry) -> JournalResult<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO journal_entries
            (date, mood_emoji, summary, reflection, encouragement, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                date_key(date),
                entry.mood_emoji,
                entry.summary,
                entry.reflection,
                entry.encouragement,
                Local::now().to_rfc3339(),
            ],
        )?;
        tracing::info!(date = %date, "saved journal entry");
        Ok(())
    }

    pub fn load_entry(&self, date: NaiveDate) -> JournalResult<Option<JournalEntry>> {
        let entry = self
            .conn
            .query_row(
                r#"
                SELECT mood_emoji, summary, reflection, encouragement
                FROM journal_entries WHERE date = ?1
                "#,
                [date_key(date)],
                |row| {
                    Ok(JournalEntry {
                        mood_emoji: row.get(0)?,
                        summary: row.get(1)?,
                        reflection: row.get(2)?,
                        encouragement: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> JournalResult<Vec<(NaiveDate, JournalEntry)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT date, mood_emoji, summary, reflection, encouragement
            FROM journal_entries ORDER BY date
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                JournalEntry {
                    mood_emoji: row.get(1)?,
                    summary: row.get(2)?,
                    reflection: row.get(3)?,
                    encouragement: row.get(4)?,
                },
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (key, entry) = row?;
            entries.push((parse_date(&key)?, entry));
        }
        Ok(entries)
    }

    /// Dates within the given month that have a saved entry, ascending.
    pub fn entry_dates_in_month(&self, year: i32, month: u32) -> JournalResult<Vec<NaiveDate>> {
        let prefix = format!("{year:04}-{month:02}-%");
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM journal_entries WHERE date LIKE ?1 ORDER BY date")?;
        let keys = stmt.query_map([prefix], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for key in keys {
            let date = parse_date(&key?)?;
            if date.year() == year && date.month() == month {
                dates.push(date);
            }
        }
        Ok(dates)
    }

    pub fn save_mood(&self, date: NaiveDate, mood: Mood) -> JournalResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO moods (date, mood) VALUES (?1, ?2)",
            params![date_key(date), mood.to_string()],
        )?;
        Ok(())
    }

    /// Unknown stored keys read back as no mood.
    pub fn load_mood(&self, date: NaiveDate) -> JournalResult<Option<Mood>> {
        let key: Option<String> = self
            .conn
            .query_row(
                "SELECT mood FROM moods WHERE date = ?1",
                [date_key(date)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key.as_deref().and_then(Mood::from_key))
    }

    pub fn save_strokes(&self, date: NaiveDate, session: &DrawingSession) -> JournalResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO sketches (date, strokes_json) VALUES (?1, ?2)",
            params![date_key(date), session.to_json()?],
        )?;
        tracing::info!(date = %date, strokes = session.len(), "saved sketch");
        Ok(())
    }

    pub fn load_strokes(&self, date: NaiveDate) -> JournalResult<Option<DrawingSession>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT strokes_json FROM sketches WHERE date = ?1",
                [date_key(date)],
                |row| row.get(0),
            )
            .optional()?;
        json.as_deref().map(DrawingSession::from_json).transpose()
    }

    /// Append a like/dislike, keeping the first 200 characters of the reflection.
    pub fn record_feedback(&self, kind: FeedbackKind, reflection: &str) -> JournalResult<Feedback> {
        let feedback = Feedback {
            kind,
            timestamp: Local::now(),
            reflection_excerpt: reflection.chars().take(FEEDBACK_EXCERPT_CHARS).collect(),
        };
        self.conn.execute(
            "INSERT INTO feedback (kind, timestamp, reflection_excerpt) VALUES (?1, ?2, ?3)",
            params![
                feedback.kind.to_string(),
                feedback.timestamp.to_rfc3339(),
                feedback.reflection_excerpt,
            ],
        )?;
        tracing::info!(kind = %kind, "recorded feedback");
        Ok(feedback)
    }

    /// All feedback in the order it was recorded.
    pub fn list_feedback(&self) -> JournalResult<Vec<Feedback>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, timestamp, reflection_excerpt FROM feedback ORDER BY id")?;

        let feedback_iter = stmt.query_map([], |row| {
            let kind_str: String = row.get(0)?;
            let kind = kind_str.parse::<FeedbackKind>().map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "kind".to_string(), rusqlite::types::Type::Text)
            })?;
            let timestamp_str: String = row.get(1)?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        1,
                        "timestamp".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(Feedback {
                kind,
                timestamp,
                reflection_excerpt: row.get(2)?,
            })
        })?;

        let mut feedback = Vec::new();
        for item in feedback_iter {
            feedback.push(item?);
        }
        Ok(feedback)
    }

    /// Wipe every table.
    pub fn clear_all(&self) -> JournalResult<()> {
        self.conn.execute_batch(
            r#"
            DELETE FROM journal_entries;
            DELETE FROM moods;
            DELETE FROM sketches;
            DELETE FROM feedback;
            "#,
        )?;
        Ok(())
    }

    /// Write one CSV row per entry (with header) and return the row count.
    pub fn export_csv<W: Write>(&self, writer: W) -> JournalResult<usize> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT date, mood_emoji, summary, reflection, encouragement, updated_at
            FROM journal_entries ORDER BY date
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut wtr = csv::Writer::from_writer(writer);
        let mut count = 0;
        for row in rows {
            let (date, mood_emoji, summary, reflection, encouragement, updated_at) = row?;
            wtr.serialize(ExportRow {
                date: &date,
                mood_emoji: mood_emoji.as_deref().unwrap_or_default(),
                summary: &summary,
                reflection: &reflection,
                encouragement: &encouragement,
                updated_at: &updated_at,
            })?;
            count += 1;
        }
        wtr.flush()?;
        Ok(count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(JournalEntry),
    /// The reflection service gave nothing back; nothing was written.
    NoReflection { summary: String },
}

/// Summarize `session`, ask `reflector` (when given) for a reflection and
/// store entry, sketch and mood for `date`. Without a reflector the entry is
/// stored with an empty reflection.
pub fn save_doodle(
    db: &JournalDb,
    date: NaiveDate,
    session: &DrawingSession,
    canvas_width: f64,
    canvas_height: f64,
    mood: Option<Mood>,
    reflector: Option<&dyn Reflector>,
) -> JournalResult<SaveOutcome> {
    if session.is_empty() {
        return Err(JournalError::InvalidInput(
            "there is no doodle to analyze".to_string(),
        ));
    }
    session.validate()?;

    let summary = summarize_doodle(session, canvas_width, canvas_height);
    let reflection = match reflector {
        Some(r) => match r.reflect(&summary)? {
            Some(reflection) => reflection,
            None => return Ok(SaveOutcome::NoReflection { summary }),
        },
        None => Reflection::default(),
    };

    if let Some(mood) = mood {
        db.save_mood(date, mood)?;
    }
    let mood = match mood {
        Some(m) => Some(m),
        None => db.load_mood(date)?,
    };

    let entry = JournalEntry {
        mood_emoji: mood.map(|m| m.emoji().to_string()),
        summary,
        reflection: reflection.reflection,
        encouragement: reflection.encouragement,
    };
    db.save_entry(date, &entry)?;
    db.save_strokes(date, session)?;
    Ok(SaveOutcome::Saved(entry))
}
