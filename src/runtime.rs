use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent};

use crate::error::DrillError;
use crate::input::Keystroke;

pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the session driver and the prompts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    Key(Keystroke),
    Resize,
    Tick,
    /// The event source hung up
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait DrillEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Production event source using crossterm.
///
/// A single reader thread lives for the whole program, so there is only ever
/// one consumer of keystrokes.
pub struct CrosstermEventSource {
    rx: Receiver<DrillEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) => match Keystroke::from(key) {
                    Keystroke::Other => continue,
                    keystroke => DrillEvent::Key(keystroke),
                },
                Ok(CtEvent::Resize(_, _)) => DrillEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    log::warn!("terminal event read failed: {}", err);
                    break;
                }
            };
            if tx.send(ev).is_err() {
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

impl DrillEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Event source fed from a channel, for tests and scripted input
pub struct TestEventSource {
    rx: Receiver<DrillEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }

    /// A source that yields each char of `keys` as a raw keystroke, then closes
    pub fn scripted(keys: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        for c in keys.chars() {
            let _ = tx.send(DrillEvent::Key(Keystroke::from(c)));
        }
        Self { rx }
    }
}

impl DrillEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: DrillEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: DrillEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> DrillEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => DrillEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => DrillEvent::Closed,
        }
    }

    /// Waits for the next keystroke, calling `redraw` on ticks and resizes
    pub fn next_key<F>(&self, mut redraw: F) -> Result<Keystroke, DrillError>
    where
        F: FnMut() -> Result<(), DrillError>,
    {
        loop {
            match self.step() {
                DrillEvent::Key(key) => return Ok(key),
                DrillEvent::Tick | DrillEvent::Resize => redraw()?,
                DrillEvent::Closed => return Err(DrillError::EventStreamClosed),
            }
        }
    }
}
