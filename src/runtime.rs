use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::browser::{BrowserAction, JournalBrowser};

/// Unified event type consumed by the journal browser loop
#[derive(Clone, Debug)]
pub enum JournalEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait JournalEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<JournalEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<JournalEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Windows reports releases too; only presses move the browser.
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(JournalEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(JournalEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    tracing::warn!("terminal event read failed: {e}");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<JournalEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-backed event source for headless runs and tests
pub struct ChannelEventSource {
    rx: Receiver<JournalEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<JournalEvent>) -> Self {
        Self { rx }
    }
}

impl JournalEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<JournalEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Feeds terminal events into a [`JournalBrowser`], turning quiet periods
/// of `tick` length into ticks that refresh the live analysis.
pub struct Runner<E: JournalEventSource> {
    events: E,
    tick: Duration,
}

impl<E: JournalEventSource> Runner<E> {
    pub fn new(events: E, tick: Duration) -> Self {
        Self { events, tick }
    }

    /// Next event, or `Tick` once the interval passes without one. A closed
    /// source keeps ticking.
    pub fn step(&self) -> JournalEvent {
        self.events
            .recv_timeout(self.tick)
            .unwrap_or(JournalEvent::Tick)
    }

    /// Takes one step and applies it to the browser.
    pub fn dispatch(&self, browser: &mut JournalBrowser) -> BrowserAction {
        match self.step() {
            JournalEvent::Tick => {
                browser.on_tick();
                BrowserAction::Continue
            }
            JournalEvent::Resize => BrowserAction::Continue,
            JournalEvent::Key(key) => browser.handle_key(key),
        }
    }
}
