//! Turns the raw input buffer into a structured answer.
//!
//! Parsing never fails: malformed input becomes an answer with `None` fields,
//! which scores as wrong.

use crate::challenge::{ChallengeMode, Direction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedAnswer {
    pub value: Option<u32>,
    pub direction: Option<Direction>,
}

pub fn parse(raw: &str, mode: ChallengeMode) -> ParsedAnswer {
    match mode {
        ChallengeMode::NumberOnly => ParsedAnswer {
            value: leading_number(raw),
            direction: None,
        },
        ChallengeMode::NumberWithDirection => parse_jump(raw),
    }
}

fn leading_number(raw: &str) -> Option<u32> {
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    // overlong input falls out of u32 and is treated as no number
    raw[..end].parse().ok()
}

/// Accepts `<digits>` or `<digits><j|k>`, nothing else
fn parse_jump(raw: &str) -> ParsedAnswer {
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, rest) = raw.split_at(split);

    if digits.is_empty() {
        return ParsedAnswer::default();
    }

    let mut rest_chars = rest.chars();
    let direction = match (rest_chars.next(), rest_chars.next()) {
        (None, _) => None,
        (Some(c), None) => match Direction::from_key(c) {
            Some(d) => Some(d),
            None => return ParsedAnswer::default(),
        },
        (Some(_), Some(_)) => return ParsedAnswer::default(),
    };

    match digits.parse() {
        Ok(value) => ParsedAnswer {
            value: Some(value),
            direction,
        },
        Err(_) => ParsedAnswer::default(),
    }
}
