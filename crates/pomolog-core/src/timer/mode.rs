use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed focus length in minutes.
pub const FOCUS_RANGE: RangeInclusive<u32> = 5..=90;
/// Allowed break length in minutes.
pub const BREAK_RANGE: RangeInclusive<u32> = 1..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Work,
    Break,
    /// Short run used to check the logging path end to end.
    Test,
}

impl TimerMode {
    /// Label written to the `Type` column of the session log.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::Break => "Break",
            TimerMode::Test => "Test Run",
        }
    }

    /// Inverse of [`label`](Self::label). Also accepts the bare mode names.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Work" => Some(TimerMode::Work),
            "Break" => Some(TimerMode::Break),
            "Test Run" | "Test" => Some(TimerMode::Test),
            _ => None,
        }
    }

    /// Whether a completed interval of this mode is written to the log.
    pub fn is_logged(&self) -> bool {
        !matches!(self, TimerMode::Break)
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "break" => Ok(TimerMode::Break),
            "test" | "test run" => Ok(TimerMode::Test),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

/// Configured length of each mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub focus_min: u32,
    pub break_min: u32,
    pub test_secs: u32,
}

impl Durations {
    /// Build durations, rejecting focus/break lengths outside their ranges.
    pub fn new(focus_min: u32, break_min: u32, test_secs: u32) -> Result<Self, ValidationError> {
        check_range("focus_minutes", focus_min, &FOCUS_RANGE)?;
        check_range("break_minutes", break_min, &BREAK_RANGE)?;
        Ok(Self {
            focus_min,
            break_min,
            test_secs,
        })
    }

    /// Default countdown length for `mode`, in seconds.
    pub fn default_secs(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Work => u64::from(self.focus_min).saturating_mul(60),
            TimerMode::Break => u64::from(self.break_min).saturating_mul(60),
            TimerMode::Test => u64::from(self.test_secs),
        }
    }

    /// Duration written to the log for a completed `mode` interval.
    ///
    /// Test runs are a few seconds, so they come out fractional; rounded to
    /// two decimals.
    pub fn logged_minutes(&self, mode: TimerMode) -> f64 {
        match mode {
            TimerMode::Work => f64::from(self.focus_min),
            TimerMode::Break => f64::from(self.break_min),
            TimerMode::Test => (f64::from(self.test_secs) / 60.0 * 100.0).round() / 100.0,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_min: 25,
            break_min: 5,
            test_secs: 5,
        }
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::DurationOutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
