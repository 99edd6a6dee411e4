use chrono::{Local, NaiveDate};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use doodle_journal::{
    app_dirs::AppDirs,
    browser::{BrowserAction, JournalBrowser},
    config::{Config, ConfigStore, FileConfigStore},
    journal::{parse_date, save_doodle, FeedbackKind, JournalDb, SaveOutcome},
    mood::Mood,
    reflection::{ChatCompletionsReflector, Reflector},
    runtime::{CrosstermEventSource, Runner},
    summary::shape_list_lines,
    compute_metrics, detect_shapes, summarize_doodle, DrawingSession,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use serde::Serialize;
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TICK_RATE_MS: u64 = 250;

/// doodle journal with shape detection and daily reflections
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Analyze freehand doodles (stroke JSON), detect rough shapes, ask a language model for a gentle reflection, and keep it all in a date-keyed journal you can browse in the terminal."
)]
pub struct Cli {
    /// journal database file (defaults to ~/.local/state/doodle-journal/journal.db)
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// config file (defaults to the platform config dir)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// print metrics, detected shapes and the summary of a sketch file
    Analyze {
        /// JSON array of strokes
        file: PathBuf,
        /// canvas width the sketch was drawn on
        #[clap(long)]
        width: Option<f64>,
        /// canvas height the sketch was drawn on
        #[clap(long)]
        height: Option<f64>,
        /// print machine-readable JSON
        #[clap(long)]
        json: bool,
    },
    /// summarize a sketch, ask for a reflection and store it for a day
    Save {
        file: PathBuf,
        /// YYYY-MM-DD, defaults to today
        #[clap(long)]
        date: Option<String>,
        #[clap(long, value_enum)]
        mood: Option<Mood>,
        /// store the summary without calling the reflection service
        #[clap(long)]
        no_reflect: bool,
    },
    /// print the journal entry for a day
    Show {
        #[clap(long)]
        date: Option<String>,
    },
    /// pin a mood to a day
    Mood {
        #[clap(value_enum)]
        mood: Mood,
        #[clap(long)]
        date: Option<String>,
    },
    /// rate the reflection saved for a day
    Feedback {
        #[clap(value_enum)]
        kind: FeedbackKind,
        #[clap(long)]
        date: Option<String>,
    },
    /// write all entries as CSV
    Export {
        /// output file, stdout when omitted
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// browse the journal month by month
    Calendar,
}

#[derive(Serialize)]
struct AnalyzeReport<'a> {
    metrics: doodle_journal::Metrics,
    shapes: Vec<doodle_journal::Shape>,
    summary: &'a str,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = store.load();

    run(cli, &config)
}

fn resolve_date(arg: Option<&str>) -> Result<NaiveDate, Box<dyn Error>> {
    Ok(match arg {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    })
}

fn open_db(cli: &Cli) -> Result<JournalDb, Box<dyn Error>> {
    let path = cli
        .db
        .clone()
        .or_else(AppDirs::db_path)
        .unwrap_or_else(|| PathBuf::from("doodle_journal.db"));
    Ok(JournalDb::open(path)?)
}

fn read_sketch(path: &Path) -> Result<DrawingSession, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)?;
    let session = DrawingSession::from_json(&json)?;
    session.validate()?;
    Ok(session)
}

fn run(cli: Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Analyze {
            file,
            width,
            height,
            json,
        } => {
            let session = read_sketch(file)?;
            let width = width.unwrap_or(config.canvas_width);
            let height = height.unwrap_or(config.canvas_height);
            let summary = summarize_doodle(&session, width, height);
            let shapes = detect_shapes(&session);

            if *json {
                let report = AnalyzeReport {
                    metrics: compute_metrics(&session, width, height),
                    shapes,
                    summary: &summary,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{summary}");
                println!();
                println!("Shapes:");
                for line in shape_list_lines(&shapes) {
                    println!("{line}");
                }
            }
        }
        Command::Save {
            file,
            date,
            mood,
            no_reflect,
        } => {
            let session = read_sketch(file)?;
            let date = resolve_date(date.as_deref())?;
            let db = open_db(&cli)?;
            let reflector = if *no_reflect {
                None
            } else {
                Some(ChatCompletionsReflector::from_config(config)?)
            };

            let outcome = save_doodle(
                &db,
                date,
                &session,
                config.canvas_width,
                config.canvas_height,
                *mood,
                reflector.as_ref().map(|r| r as &dyn Reflector),
            )?;
            match outcome {
                SaveOutcome::Saved(entry) => {
                    println!("{}", entry.summary);
                    if !entry.reflection.is_empty() {
                        println!();
                        println!("{}", entry.reflection);
                        println!("{}", entry.encouragement);
                    }
                    println!();
                    println!("Saved journal entry for {date}.");
                }
                SaveOutcome::NoReflection { summary } => {
                    println!("{summary}");
                    return Err(
                        "could not get a reflection (check API key or network); nothing saved"
                            .into(),
                    );
                }
            }
        }
        Command::Show { date } => {
            let date = resolve_date(date.as_deref())?;
            let db = open_db(&cli)?;
            let Some(entry) = db.load_entry(date)? else {
                println!("No journal entry for {date}.");
                return Ok(());
            };
            let mood = db.load_mood(date)?;

            println!("{}", date.format("%A, %B %-d %Y"));
            match (mood, &entry.mood_emoji) {
                (Some(m), _) => println!("Mood: {} {m}", m.emoji()),
                (None, Some(emoji)) => println!("Mood: {emoji}"),
                (None, None) => {}
            }
            println!();
            println!("{}", entry.summary);
            if !entry.reflection.is_empty() {
                println!();
                println!("{}", entry.reflection);
                println!("{}", entry.encouragement);
            }
            if let Some(sketch) = db.load_strokes(date)? {
                println!();
                for line in shape_list_lines(&detect_shapes(&sketch)) {
                    println!("{line}");
                }
            }
        }
        Command::Mood { mood, date } => {
            let date = resolve_date(date.as_deref())?;
            open_db(&cli)?.save_mood(date, *mood)?;
            println!("Mood for {date}: {} {mood}", mood.emoji());
        }
        Command::Feedback { kind, date } => {
            let date = resolve_date(date.as_deref())?;
            let db = open_db(&cli)?;
            let reflection = db
                .load_entry(date)?
                .map(|e| e.reflection)
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| format!("no reflection to rate for {date}"))?;
            db.record_feedback(*kind, &reflection)?;
            println!("Thanks! Saved {kind} for {date}.");
        }
        Command::Export { output } => {
            let db = open_db(&cli)?;
            let count = match output {
                Some(path) => db.export_csv(File::create(path)?)?,
                None => db.export_csv(io::stdout().lock())?,
            };
            eprintln!("Exported {count} entries.");
        }
        Command::Calendar => {
            if !stdin().is_tty() {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
            }
            let db = open_db(&cli)?;
            let mut browser =
                JournalBrowser::open_today(db, config.canvas_width, config.canvas_height)?;

            enable_raw_mode()?;
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;

            let result = start_tui(&mut terminal, &mut browser);

            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
            result?;
        }
    }
    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    browser: &mut JournalBrowser,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| f.render_widget(&*browser, f.area()))?;
    while runner.dispatch(browser) == BrowserAction::Continue {
        terminal.draw(|f| f.render_widget(&*browser, f.area()))?;
    }
    Ok(())
}
