//! The screens around a session: welcome, digit choice, instructions,
//! results and the play-again loop.

use ratatui::backend::Backend;

use crate::challenge::ChallengeMode;
use crate::config::Config;
use crate::error::DrillError;
use crate::input::{any_key, digit_choice, play_again, Keystroke, PromptStep};
use crate::report::Report;
use crate::runtime::{DrillEventSource, Runner, Ticker};
use crate::session::{run_session, Session, SessionOutcome};
use crate::ui::{TerminalPresenter, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppOptions {
    pub mode: ChallengeMode,
    /// digit chosen up front; skips the digit prompt
    pub required_digit: Option<u8>,
    /// play every number; skips the digit prompt
    pub all_numbers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// the player declined to play again
    Finished,
    /// Ctrl-C
    Interrupted,
}

/// Shows a view until `on_key` accepts a key. `None` means Ctrl-C.
fn prompt<'v, E, T, B, R, F>(
    runner: &Runner<E, T>,
    presenter: &mut TerminalPresenter<B>,
    view: F,
    on_key: fn(Keystroke) -> PromptStep<R>,
) -> Result<Option<R>, DrillError>
where
    E: DrillEventSource,
    T: Ticker,
    B: Backend,
    F: Fn() -> View<'v>,
{
    presenter.draw(view())?;
    loop {
        let key = runner.next_key(|| presenter.draw(view()))?;
        match on_key(key) {
            PromptStep::Chosen(choice) => return Ok(Some(choice)),
            PromptStep::Interrupted => return Ok(None),
            PromptStep::Ignored => {}
        }
    }
}

pub fn run_app<E, T, B>(
    options: AppOptions,
    config: &Config,
    runner: &Runner<E, T>,
    presenter: &mut TerminalPresenter<B>,
) -> Result<Flow, DrillError>
where
    E: DrillEventSource,
    T: Ticker,
    B: Backend,
{
    let mode = options.mode;

    if prompt(runner, presenter, || View::Welcome { mode }, any_key)?.is_none() {
        return Ok(Flow::Interrupted);
    }

    let required_digit = match mode {
        ChallengeMode::NumberOnly => None,
        ChallengeMode::NumberWithDirection if options.all_numbers => None,
        ChallengeMode::NumberWithDirection => match options.required_digit {
            Some(digit) => Some(digit),
            None => match prompt(runner, presenter, || View::DigitPrompt, digit_choice)? {
                Some(choice) => choice,
                None => return Ok(Flow::Interrupted),
            },
        },
    };

    loop {
        let instructions = || View::Instructions {
            mode,
            required_digit,
        };
        if prompt(runner, presenter, instructions, any_key)?.is_none() {
            return Ok(Flow::Interrupted);
        }

        let mut session = Session::generate(config.session_config(mode, required_digit));
        if run_session(&mut session, runner, presenter)? == SessionOutcome::Interrupted {
            return Ok(Flow::Interrupted);
        }

        let Some(report) = Report::from_session(&session) else {
            return Ok(Flow::Finished);
        };
        match prompt(runner, presenter, || View::Results { report: &report }, play_again)? {
            Some(true) => log::info!("playing again"),
            Some(false) => return Ok(Flow::Finished),
            None => return Ok(Flow::Interrupted),
        }
    }
}
