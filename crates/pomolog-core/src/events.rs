use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::SessionRecord;
use crate::timer::TimerMode;

/// Every state change in a session produces an Event.
/// The presentation layer drains them from the runner's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown hit zero. Fires once per `start`.
    TimerCompleted {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TaskRenamed {
        task_name: String,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        focus_min: u32,
        break_min: u32,
        at: DateTime<Utc>,
    },
    /// A completed Work/Test interval was appended to the log store.
    SessionLogged {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    /// The append failed. The timer still counts the session as finished.
    SessionLogFailed {
        mode: TimerMode,
        error: String,
        at: DateTime<Utc>,
    },
    /// A command could not be applied (e.g. a duration out of range).
    CommandRejected {
        reason: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        remaining_secs: u64,
        running: bool,
        /// Remaining time as `MM:SS`.
        display: String,
        task_name: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for `TimerCompleted`.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
