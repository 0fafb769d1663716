//! Keystroke handling for one challenge.
//!
//! An [`InputMachine`] is consumed by every call to [`InputMachine::feed`] and
//! handed back only while the answer is still pending, so a machine that has
//! submitted or cancelled cannot receive another key. Each challenge gets a
//! fresh machine.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::challenge::{ChallengeMode, Direction};

/// A single key press, reduced to what the drills care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Enter,
    Backspace,
    /// Ctrl-C
    Interrupt,
    Other,
}

impl From<KeyEvent> for Keystroke {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return Keystroke::Other;
        }

        match key.code {
            KeyCode::Char(c)
                if key.modifiers.contains(KeyModifiers::CONTROL) && c.eq_ignore_ascii_case(&'c') =>
            {
                Keystroke::Interrupt
            }
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Keystroke::Other
            }
            KeyCode::Char(c) => Keystroke::from(c),
            KeyCode::Enter => Keystroke::Enter,
            KeyCode::Backspace => Keystroke::Backspace,
            _ => Keystroke::Other,
        }
    }
}

/// Raw terminal bytes as they arrive with line buffering off
impl From<char> for Keystroke {
    fn from(c: char) -> Self {
        match c {
            '\u{3}' => Keystroke::Interrupt,
            '\r' | '\n' => Keystroke::Enter,
            '\u{7f}' | '\u{8}' => Keystroke::Backspace,
            c if c.is_control() => Keystroke::Other,
            c => Keystroke::Char(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Quit,
}

/// Result of feeding one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputStep {
    Pending(InputMachine),
    Submitted(String),
    Cancelled(CancelReason),
    /// Ctrl-C; ends the whole program
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMachine {
    mode: ChallengeMode,
    buffer: String,
}

impl InputMachine {
    pub fn new(mode: ChallengeMode) -> Self {
        Self {
            mode,
            buffer: String::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn has_digits(&self) -> bool {
        self.buffer.chars().any(|c| c.is_ascii_digit())
    }

    pub fn feed(mut self, key: Keystroke) -> InputStep {
        match key {
            Keystroke::Interrupt => InputStep::Interrupted,
            // q is only a quit key before anything has been typed
            Keystroke::Char(c) if c.eq_ignore_ascii_case(&'q') && self.buffer.is_empty() => {
                InputStep::Cancelled(CancelReason::Quit)
            }
            Keystroke::Backspace => {
                self.buffer.pop();
                InputStep::Pending(self)
            }
            Keystroke::Enter if self.mode == ChallengeMode::NumberOnly => {
                InputStep::Submitted(self.buffer)
            }
            Keystroke::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                InputStep::Pending(self)
            }
            Keystroke::Char(c)
                if self.mode == ChallengeMode::NumberWithDirection
                    && Direction::from_key(c).is_some()
                    && self.has_digits() =>
            {
                self.buffer.push(c.to_ascii_lowercase());
                InputStep::Submitted(self.buffer)
            }
            _ => InputStep::Pending(self),
        }
    }
}

/// Outcome of a key on one of the single-key prompts between sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep<T> {
    Ignored,
    Chosen(T),
    Interrupted,
}

/// "Press any key": everything but Ctrl-C and non-key noise continues
pub fn any_key(key: Keystroke) -> PromptStep<()> {
    match key {
        Keystroke::Interrupt => PromptStep::Interrupted,
        Keystroke::Other => PromptStep::Ignored,
        _ => PromptStep::Chosen(()),
    }
}

/// Base digit prompt: a digit filters on it, Enter means all numbers
pub fn digit_choice(key: Keystroke) -> PromptStep<Option<u8>> {
    match key {
        Keystroke::Interrupt => PromptStep::Interrupted,
        Keystroke::Enter => PromptStep::Chosen(None),
        Keystroke::Char(c) if c.is_ascii_digit() => PromptStep::Chosen(Some(c as u8 - b'0')),
        _ => PromptStep::Ignored,
    }
}

/// "Play again? (y/n)": only y continues
pub fn play_again(key: Keystroke) -> PromptStep<bool> {
    match key {
        Keystroke::Interrupt => PromptStep::Interrupted,
        Keystroke::Other => PromptStep::Ignored,
        Keystroke::Char(c) => PromptStep::Chosen(c.eq_ignore_ascii_case(&'y')),
        _ => PromptStep::Chosen(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const NUMBER: ChallengeMode = ChallengeMode::NumberOnly;
    const JUMP: ChallengeMode = ChallengeMode::NumberWithDirection;

    /// Feeds keys until the machine leaves `Pending`, returning the last step
    fn run(mode: ChallengeMode, keys: &str) -> InputStep {
        let mut machine = InputMachine::new(mode);
        for c in keys.chars() {
            match machine.feed(Keystroke::from(c)) {
                InputStep::Pending(next) => machine = next,
                done => return done,
            }
        }
        InputStep::Pending(machine)
    }

    fn pending_buffer(step: InputStep) -> String {
        match step {
            InputStep::Pending(machine) => machine.buffer().to_string(),
            other => panic!("expected Pending, got {:?}", other),
        }
    }

    #[test]
    fn test_number_submits_on_enter() {
        assert_eq!(run(NUMBER, "42\r"), InputStep::Submitted("42".to_string()));
    }

    #[test]
    fn test_enter_on_empty_buffer_submits_empty() {
        assert_eq!(run(NUMBER, "\n"), InputStep::Submitted(String::new()));
    }

    #[test]
    fn test_jump_auto_submits_on_direction() {
        assert_eq!(run(JUMP, "15j"), InputStep::Submitted("15j".to_string()));
        assert_eq!(run(JUMP, "8K"), InputStep::Submitted("8k".to_string()));
    }

    #[test]
    fn test_jump_ignores_enter_and_leading_direction() {
        assert_eq!(pending_buffer(run(JUMP, "j\r")), "");
        assert_eq!(pending_buffer(run(JUMP, "k3\r")), "3");
    }

    #[test]
    fn test_number_mode_ignores_direction_letters() {
        assert_eq!(pending_buffer(run(NUMBER, "15j")), "15");
    }

    #[test]
    fn test_quit_on_empty_buffer() {
        assert_eq!(run(JUMP, "q"), InputStep::Cancelled(CancelReason::Quit));
        assert_eq!(run(NUMBER, "Q"), InputStep::Cancelled(CancelReason::Quit));
    }

    #[test]
    fn test_quit_ignored_after_digit() {
        assert_eq!(pending_buffer(run(JUMP, "3q")), "3");
    }

    #[test]
    fn test_quit_allowed_again_after_clearing_buffer() {
        assert_eq!(run(NUMBER, "3\u{7f}q"), InputStep::Cancelled(CancelReason::Quit));
    }

    #[test]
    fn test_backspace() {
        assert_eq!(pending_buffer(run(NUMBER, "99\u{7f}5")), "95");
        assert_eq!(pending_buffer(run(NUMBER, "\u{7f}\u{8}")), "");
    }

    #[test]
    fn test_interrupt_wins_over_everything() {
        assert_eq!(run(NUMBER, "\u{3}"), InputStep::Interrupted);
        assert_eq!(run(JUMP, "12\u{3}j"), InputStep::Interrupted);
    }

    #[test]
    fn test_other_characters_ignored() {
        assert_eq!(pending_buffer(run(NUMBER, "a1-b2 ")), "12");
        assert_eq!(pending_buffer(run(NUMBER, "٤")), "");
    }

    #[test]
    fn test_key_event_translation() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Keystroke::from(ctrl_c), Keystroke::Interrupt);

        let alt_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::ALT);
        assert_eq!(Keystroke::from(alt_j), Keystroke::Other);

        let shifted = KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(Keystroke::from(shifted), Keystroke::Char('K'));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(Keystroke::from(enter), Keystroke::Enter);

        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(Keystroke::from(backspace), Keystroke::Backspace);

        let mut release = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(Keystroke::from(release), Keystroke::Other);
    }

    #[test]
    fn test_digit_choice() {
        assert_eq!(digit_choice(Keystroke::Char('7')), PromptStep::Chosen(Some(7)));
        assert_eq!(digit_choice(Keystroke::Enter), PromptStep::Chosen(None));
        assert_eq!(digit_choice(Keystroke::Char('x')), PromptStep::Ignored);
        assert_eq!(digit_choice(Keystroke::Interrupt), PromptStep::Interrupted);
    }

    #[test]
    fn test_play_again() {
        assert_eq!(play_again(Keystroke::Char('Y')), PromptStep::Chosen(true));
        assert_eq!(play_again(Keystroke::Char('n')), PromptStep::Chosen(false));
        assert_eq!(play_again(Keystroke::Enter), PromptStep::Chosen(false));
        assert_matches!(play_again(Keystroke::Interrupt), PromptStep::Interrupted);
    }

    #[test]
    fn test_any_key() {
        assert_eq!(any_key(Keystroke::Enter), PromptStep::Chosen(()));
        assert_eq!(any_key(Keystroke::Other), PromptStep::Ignored);
        assert_eq!(any_key(Keystroke::Interrupt), PromptStep::Interrupted);
    }
}
