//! Turns completed intervals into log rows.

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::storage::{LogStore, SessionRecord};
use crate::timer::{Durations, TimerMode};

/// Logged when neither the user nor the config supplies a task name.
pub const DEFAULT_TASK_NAME: &str = "Untitled Task";

pub struct SessionRecorder {
    placeholder: String,
    clock: Box<dyn Clock>,
}

impl SessionRecorder {
    pub fn new(placeholder: impl Into<String>) -> Self {
        let placeholder = placeholder.into();
        let placeholder = if placeholder.trim().is_empty() {
            DEFAULT_TASK_NAME.to_string()
        } else {
            placeholder.trim().to_string()
        };
        Self {
            placeholder,
            clock: Box::new(SystemClock),
        }
    }

    /// Stamp records with `clock` instead of local time.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The name that will be logged for `task_name`.
    pub fn task_label(&self, task_name: &str) -> String {
        let trimmed = task_name.trim();
        if trimmed.is_empty() {
            self.placeholder.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Row for a completed `mode` interval, or `None` for breaks.
    pub fn build(
        &self,
        mode: TimerMode,
        task_name: &str,
        durations: &Durations,
    ) -> Option<SessionRecord> {
        if !mode.is_logged() {
            return None;
        }
        let now = self.clock.now();
        Some(SessionRecord {
            date: now.date(),
            time: now.time(),
            task_name: self.task_label(task_name),
            duration_min: durations.logged_minutes(mode),
            session_type: mode,
        })
    }

    /// Build and append in one step. Exactly one `append` for Work/Test,
    /// none for Break. Failures are returned as-is; nothing is retried.
    pub async fn record<S: LogStore>(
        &self,
        store: &mut S,
        mode: TimerMode,
        task_name: &str,
        durations: &Durations,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let Some(record) = self.build(mode, task_name, durations) else {
            return Ok(None);
        };
        store.append(&record).await?;
        Ok(Some(record))
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_NAME)
    }
}
