use std::{fmt, str::FromStr};

use time::Date;

/// Prediction granularity. Each mode has its own model and input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Daily,
    Weekly,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Daily => "daily",
            Mode::Weekly => "weekly",
        }
    }

    /// Capitalized name used in user-facing messages.
    pub fn title(&self) -> &'static str {
        match self {
            Mode::Daily => "Daily",
            Mode::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown mode '{0}', expected 'daily' or 'weekly'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Mode::Daily),
            "weekly" | "w" => Ok(Mode::Weekly),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// A single model output together with the date it is plotted at.
///
/// Never persisted; recomputed on every predict action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub mode: Mode,
    pub value_mw: f64,
    pub anchor_date: Date,
}
