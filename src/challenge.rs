use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of challenges in every session
pub const CHALLENGE_COUNT: usize = 10;

/// Which drill is being played
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
pub enum ChallengeMode {
    /// retype the number and press enter
    #[default]
    #[value(name = "number")]
    #[serde(rename = "number")]
    #[strum(serialize = "number")]
    NumberOnly,
    /// type the number followed by j (down) or k (up)
    #[value(name = "jump")]
    #[serde(rename = "jump")]
    #[strum(serialize = "jump")]
    NumberWithDirection,
}

impl ChallengeMode {
    pub fn upper_bound(&self) -> u32 {
        match self {
            ChallengeMode::NumberOnly => 100,
            ChallengeMode::NumberWithDirection => 99,
        }
    }

    pub fn has_direction(&self) -> bool {
        matches!(self, ChallengeMode::NumberWithDirection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// The vim motion key for this direction
    pub fn key(&self) -> char {
        match self {
            Direction::Down => 'j',
            Direction::Up => 'k',
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            Direction::Down => '↓',
            Direction::Up => '↑',
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'j' => Some(Direction::Down),
            'k' => Some(Direction::Up),
            _ => None,
        }
    }
}

/// One prompt shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub value: u32,
    pub direction: Option<Direction>,
}

impl Challenge {
    pub fn number(value: u32) -> Self {
        Self {
            value,
            direction: None,
        }
    }

    pub fn jump(value: u32, direction: Direction) -> Self {
        Self {
            value,
            direction: Some(direction),
        }
    }
}

/// Renders the answer that would be scored correct, e.g. `42` or `15j`
impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(direction) = self.direction {
            write!(f, "{}", direction.key())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub count: usize,
    pub upper_bound: u32,
    pub required_digit: Option<u8>,
    pub with_direction: bool,
}

impl GeneratorConfig {
    pub fn for_mode(mode: ChallengeMode, required_digit: Option<u8>) -> Self {
        Self {
            count: CHALLENGE_COUNT,
            upper_bound: mode.upper_bound(),
            required_digit,
            with_direction: mode.has_direction(),
        }
    }
}

/// Whether the decimal form of `value` contains `digit`
pub fn contains_digit(value: u32, digit: u8) -> bool {
    match char::from_digit(u32::from(digit), 10) {
        Some(d) => value.to_string().contains(d),
        None => false,
    }
}

/// Every value in `[1, upper_bound]` that passes the digit filter
pub fn candidate_pool(config: &GeneratorConfig) -> Vec<u32> {
    (1..=config.upper_bound)
        .filter(|&v| config.required_digit.map_or(true, |d| contains_digit(v, d)))
        .collect()
}

pub fn generate(config: &GeneratorConfig) -> Vec<Challenge> {
    generate_with_rng(config, &mut rand::thread_rng())
}

/// Draws challenges without replacement. When the filtered pool is smaller
/// than `config.count` the returned set is shorter.
pub fn generate_with_rng<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Vec<Challenge> {
    let pool = candidate_pool(config);
    let values: Vec<u32> = pool.choose_multiple(&mut *rng, config.count).copied().collect();

    if values.len() < config.count {
        log::warn!(
            "candidate pool for digit {:?} holds {} values, session shortened from {}",
            config.required_digit,
            pool.len(),
            config.count
        );
    }

    values
        .into_iter()
        .map(|value| Challenge {
            value,
            direction: config.with_direction.then(|| {
                if rng.gen_bool(0.5) {
                    Direction::Down
                } else {
                    Direction::Up
                }
            }),
        })
        .collect()
}
