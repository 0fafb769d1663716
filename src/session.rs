use std::time::Duration;

use chrono::{DateTime, Local};

use crate::challenge::{generate, Challenge, ChallengeMode, GeneratorConfig};
use crate::error::DrillError;
use crate::input::{InputMachine, InputStep, Keystroke};
use crate::runtime::{DrillEvent, DrillEventSource, Runner, Ticker};
pub use crate::stats::AnswerRecord;
use crate::stats::{score, SessionStats};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub mode: ChallengeMode,
    pub required_digit: Option<u8>,
    /// how long per-answer feedback stays on screen
    pub feedback_pause: Duration,
    /// pause after the last answer before results
    pub finish_pause: Duration,
}

impl SessionConfig {
    pub fn new(mode: ChallengeMode, required_digit: Option<u8>) -> Self {
        Self {
            mode,
            required_digit,
            feedback_pause: Duration::from_millis(300),
            finish_pause: Duration::from_millis(500),
        }
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::for_mode(self.mode, self.required_digit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Complete { aborted: bool },
}

/// What a keystroke did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session is not running; the key was dropped
    Ignored,
    /// The answer for the current challenge is still being typed
    Pending,
    Answered { record: AnswerRecord, finished: bool },
    Quit,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(SessionStats),
    Quit(SessionStats),
    Interrupted,
}

/// One run through a challenge set.
///
/// `records.len()` is always the index of the current challenge.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    challenges: Vec<Challenge>,
    records: Vec<AnswerRecord>,
    input: Option<InputMachine>,
    phase: SessionPhase,
    started_at: Option<DateTime<Local>>,
    ended_at: Option<DateTime<Local>>,
    presented_at: Option<DateTime<Local>>,
}

impl Session {
    pub fn new(config: SessionConfig, challenges: Vec<Challenge>) -> Self {
        Self {
            config,
            challenges,
            records: Vec::new(),
            input: None,
            phase: SessionPhase::NotStarted,
            started_at: None,
            ended_at: None,
            presented_at: None,
        }
    }

    /// Builds a session with freshly generated challenges
    pub fn generate(config: SessionConfig) -> Self {
        let challenges = generate(&config.generator_config());
        Self::new(config, challenges)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> ChallengeMode {
        self.config.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn current_index(&self) -> usize {
        self.records.len()
    }

    pub fn current_challenge(&self) -> Option<&Challenge> {
        match self.phase {
            SessionPhase::Running => self.challenges.get(self.current_index()),
            _ => None,
        }
    }

    /// What has been typed so far for the current challenge
    pub fn buffer(&self) -> &str {
        self.input.as_ref().map_or("", |m| m.buffer())
    }

    /// Seconds the current challenge has been on screen
    pub fn challenge_secs(&self, now: DateTime<Local>) -> f64 {
        match (self.phase, self.presented_at) {
            (SessionPhase::Running, Some(shown)) => (now - shown).num_milliseconds().max(0) as f64 / 1000.0,
            _ => 0.0,
        }
    }

    pub fn elapsed_secs(&self, now: DateTime<Local>) -> f64 {
        match self.started_at {
            Some(start) => {
                let end = self.ended_at.unwrap_or(now);
                (end - start).num_milliseconds().max(0) as f64 / 1000.0
            }
            None => 0.0,
        }
    }

    pub fn start(&mut self, now: DateTime<Local>) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }

        log::info!(
            "session started: mode={} digit={:?} challenges={}",
            self.config.mode,
            self.config.required_digit,
            self.challenges.len()
        );

        self.started_at = Some(now);
        if self.challenges.is_empty() {
            self.complete(now, false);
        } else {
            self.phase = SessionPhase::Running;
            self.activate(now);
        }
    }

    fn activate(&mut self, now: DateTime<Local>) {
        self.presented_at = Some(now);
        self.input = Some(InputMachine::new(self.config.mode));
    }

    fn complete(&mut self, now: DateTime<Local>, aborted: bool) {
        self.input = None;
        self.ended_at = Some(now);
        self.phase = SessionPhase::Complete { aborted };
    }

    pub fn handle_key(&mut self, key: Keystroke, now: DateTime<Local>) -> SessionEvent {
        if self.phase != SessionPhase::Running {
            return SessionEvent::Ignored;
        }
        let Some(machine) = self.input.take() else {
            return SessionEvent::Ignored;
        };

        match machine.feed(key) {
            InputStep::Pending(machine) => {
                self.input = Some(machine);
                SessionEvent::Pending
            }
            InputStep::Submitted(raw) => {
                let expected = self.challenges[self.current_index()];
                let record = score(&expected, raw, self.config.mode);
                log::debug!(
                    "challenge {} expected {} typed {:?} correct={}",
                    self.current_index() + 1,
                    expected,
                    record.typed,
                    record.correct
                );
                self.records.push(record.clone());

                let finished = self.records.len() == self.challenges.len();
                if finished {
                    self.complete(now, false);
                } else {
                    self.activate(now);
                }
                SessionEvent::Answered { record, finished }
            }
            InputStep::Cancelled(reason) => {
                log::info!(
                    "session quit ({:?}) after {} of {} challenges",
                    reason,
                    self.records.len(),
                    self.challenges.len()
                );
                self.complete(now, true);
                SessionEvent::Quit
            }
            InputStep::Interrupted => {
                log::info!("interrupted");
                SessionEvent::Interrupted
            }
        }
    }

    /// Available once the session is complete
    pub fn stats(&self) -> Option<SessionStats> {
        match (self.phase, self.started_at, self.ended_at) {
            (SessionPhase::Complete { aborted }, Some(start), Some(end)) => Some(
                SessionStats::from_records(&self.records, self.challenges.len(), start, end, aborted),
            ),
            _ => None,
        }
    }
}

/// Draws the session; implemented by the terminal UI and by test doubles
pub trait Presenter {
    fn show_challenge(&mut self, session: &Session) -> Result<(), DrillError>;
    fn show_feedback(&mut self, session: &Session, record: &AnswerRecord) -> Result<(), DrillError>;
}

/// Drives `session` to completion with keys from `runner`.
///
/// Keys for the next challenge are not read until the current answer has
/// been scored and its feedback shown.
pub fn run_session<E, T, P>(
    session: &mut Session,
    runner: &Runner<E, T>,
    presenter: &mut P,
) -> Result<SessionOutcome, DrillError>
where
    E: DrillEventSource,
    T: Ticker,
    P: Presenter,
{
    session.start(Local::now());

    loop {
        if let Some(stats) = session.stats() {
            log::info!(
                "session complete: {}/{} correct in {:.2}s",
                stats.correct_count,
                stats.total,
                stats.elapsed_secs()
            );
            return Ok(if stats.aborted {
                SessionOutcome::Quit(stats)
            } else {
                SessionOutcome::Completed(stats)
            });
        }

        presenter.show_challenge(session)?;

        let key = match runner.step() {
            DrillEvent::Key(key) => key,
            DrillEvent::Tick | DrillEvent::Resize => continue,
            DrillEvent::Closed => return Err(DrillError::EventStreamClosed),
        };

        match session.handle_key(key, Local::now()) {
            SessionEvent::Answered { record, finished } => {
                presenter.show_feedback(session, &record)?;
                let pause = if finished {
                    session.config().finish_pause
                } else {
                    session.config().feedback_pause
                };
                if !pause.is_zero() {
                    std::thread::sleep(pause);
                }
            }
            SessionEvent::Interrupted => return Ok(SessionOutcome::Interrupted),
            SessionEvent::Ignored | SessionEvent::Pending | SessionEvent::Quit => {}
        }
    }
}
