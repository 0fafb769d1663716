//! Summary of a completed session, ready to be rendered.

use crate::challenge::ChallengeMode;
use crate::session::Session;
use crate::stats::{AnswerRecord, SessionStats};

/// Closing commentary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    LightningFast,
    GreatSpeed,
    NeedsSpeed,
    GreatAccuracy,
    GoodEffort,
    KeepPracticing,
}

impl Rating {
    pub fn message(&self) -> &'static str {
        match self {
            Rating::LightningFast => "🏆 Perfect score + Lightning fast!",
            Rating::GreatSpeed => "⭐ Perfect score! Great speed!",
            Rating::NeedsSpeed => "🎉 Perfect score! Keep practicing for speed!",
            Rating::GreatAccuracy => "👍 Great accuracy! Keep practicing!",
            Rating::GoodEffort => "💪 Good effort! Focus on accuracy!",
            Rating::KeepPracticing => "📈 Keep practicing to improve!",
        }
    }
}

/// Colour band for a headline number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Fair,
    Poor,
}

/// Seconds under which a full session counts as fast / steady
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeThresholds {
    pub fast: f64,
    pub steady: f64,
}

impl TimeThresholds {
    pub fn for_mode(mode: ChallengeMode) -> Self {
        match mode {
            ChallengeMode::NumberOnly => Self {
                fast: 15.0,
                steady: 30.0,
            },
            ChallengeMode::NumberWithDirection => Self {
                fast: 20.0,
                steady: 40.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub mode: ChallengeMode,
    pub required_digit: Option<u8>,
    pub stats: SessionStats,
    pub records: Vec<AnswerRecord>,
}

impl Report {
    /// `None` until the session is complete
    pub fn from_session(session: &Session) -> Option<Self> {
        Some(Self {
            mode: session.mode(),
            required_digit: session.config().required_digit,
            stats: session.stats()?,
            records: session.records().to_vec(),
        })
    }

    fn thresholds(&self) -> TimeThresholds {
        TimeThresholds::for_mode(self.mode)
    }

    pub fn rating(&self) -> Rating {
        let accuracy = self.stats.accuracy();
        let secs = self.stats.elapsed_secs();
        let limits = self.thresholds();

        if self.stats.is_perfect() {
            if secs < limits.fast {
                Rating::LightningFast
            } else if secs < limits.steady {
                Rating::GreatSpeed
            } else {
                Rating::NeedsSpeed
            }
        } else if accuracy >= 80.0 {
            Rating::GreatAccuracy
        } else if accuracy >= 60.0 {
            Rating::GoodEffort
        } else {
            Rating::KeepPracticing
        }
    }

    pub fn score_tier(&self) -> Tier {
        if self.stats.is_perfect() {
            Tier::Good
        } else if self.stats.accuracy() >= 80.0 {
            Tier::Fair
        } else {
            Tier::Poor
        }
    }

    pub fn accuracy_tier(&self) -> Tier {
        match self.stats.accuracy() {
            a if a >= 80.0 => Tier::Good,
            a if a >= 60.0 => Tier::Fair,
            _ => Tier::Poor,
        }
    }

    pub fn time_tier(&self) -> Tier {
        let limits = self.thresholds();
        match self.stats.elapsed_secs() {
            s if s < limits.fast => Tier::Good,
            s if s < limits.steady => Tier::Fair,
            _ => Tier::Poor,
        }
    }
}
