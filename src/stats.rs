use chrono::{DateTime, Local};

use crate::answer::{parse, ParsedAnswer};
use crate::challenge::{Challenge, ChallengeMode};

/// Result of one answered challenge; never changed after it is logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub expected: Challenge,
    pub typed: String,
    pub correct: bool,
    pub value_correct: bool,
    pub direction_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    WrongDirection,
    WrongNumber,
    Wrong,
}

impl AnswerRecord {
    pub fn verdict(&self) -> Verdict {
        match (self.value_correct, self.direction_correct) {
            (true, true) => Verdict::Correct,
            (true, false) => Verdict::WrongDirection,
            (false, true) if self.expected.direction.is_some() => Verdict::WrongNumber,
            _ => Verdict::Wrong,
        }
    }
}

pub fn compare(expected: &Challenge, answer: &ParsedAnswer) -> (bool, bool) {
    let value_correct = answer.value == Some(expected.value);
    let direction_correct = answer.direction == expected.direction;
    (value_correct, direction_correct)
}

/// Parses `typed` for `mode` and checks it against `expected`
pub fn score(expected: &Challenge, typed: String, mode: ChallengeMode) -> AnswerRecord {
    let answer = parse(&typed, mode);
    let (value_correct, direction_correct) = compare(expected, &answer);

    AnswerRecord {
        expected: *expected,
        typed,
        correct: value_correct && direction_correct,
        value_correct,
        direction_correct,
    }
}

/// Read-only summary of a finished (or quit) session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub correct_count: usize,
    pub total: usize,
    /// challenges generated for the session
    pub planned: usize,
    pub aborted: bool,
}

impl SessionStats {
    pub fn from_records(
        records: &[AnswerRecord],
        planned: usize,
        started_at: DateTime<Local>,
        ended_at: DateTime<Local>,
        aborted: bool,
    ) -> Self {
        Self {
            started_at,
            ended_at,
            correct_count: records.iter().filter(|r| r.correct).count(),
            total: records.len(),
            planned,
            aborted,
        }
    }

    /// What the score is out of: every planned challenge once the session
    /// was quit, otherwise the answers given
    pub fn out_of(&self) -> usize {
        if self.aborted {
            self.planned.max(self.total)
        } else {
            self.total
        }
    }

    /// Percentage of `out_of` that was answered correctly
    pub fn accuracy(&self) -> f64 {
        match self.out_of() {
            0 => 0.0,
            n => self.correct_count as f64 / n as f64 * 100.0,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds().max(0) as f64 / 1000.0
    }

    /// A quit session is never perfect, however well it started
    pub fn is_perfect(&self) -> bool {
        !self.aborted && self.total > 0 && self.correct_count == self.total
    }
}
