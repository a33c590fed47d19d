//! One user's timer session: engine, task name, durations and log store
//! owned together, with no shared or global state.

use chrono::Utc;

use super::recorder::SessionRecorder;
use crate::error::ValidationError;
use crate::events::Event;
use crate::history::format_clock;
use crate::storage::{Config, LogStore, SessionRecord};
use crate::timer::{Durations, TimerEngine, TimerMode, TimerState};

pub struct FocusSession<S> {
    engine: TimerEngine,
    durations: Durations,
    task_name: String,
    recorder: SessionRecorder,
    store: S,
}

impl<S: LogStore> FocusSession<S> {
    /// Idle session showing the Work default.
    pub fn new(store: S, durations: Durations, recorder: SessionRecorder) -> Self {
        Self {
            engine: TimerEngine::new(TimerMode::Work, durations.default_secs(TimerMode::Work)),
            durations,
            task_name: String::new(),
            recorder,
            store,
        }
    }

    pub fn from_config(store: S, config: &Config) -> Result<Self, ValidationError> {
        Ok(Self::new(
            store,
            config.durations()?,
            SessionRecorder::new(config.task.default_name.clone()),
        ))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_clock(self.engine.remaining_secs())
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(&self.recorder.task_label(&self.task_name))
    }

    /// Up to `n` logged sessions, newest first. Never fails.
    pub async fn recent_history(&self, n: usize) -> Vec<SessionRecord> {
        self.store.read_recent(n).await
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start `mode` with its configured length.
    pub fn start(&mut self, mode: TimerMode) -> Event {
        self.start_with(mode, self.durations.default_secs(mode))
    }

    /// Start `mode` with an explicit length in seconds.
    pub fn start_with(&mut self, mode: TimerMode, duration_secs: u64) -> Event {
        tracing::info!(%mode, duration_secs, task = %self.task_name, "timer started");
        self.engine.start(mode, duration_secs)
    }

    pub fn reset(&mut self) -> Event {
        let default = self.durations.default_secs(self.engine.mode());
        tracing::debug!(mode = %self.engine.mode(), "timer reset");
        self.engine.reset(default)
    }

    pub fn set_task_name(&mut self, name: impl Into<String>) -> Event {
        self.task_name = name.into();
        Event::TaskRenamed {
            task_name: self.recorder.task_label(&self.task_name),
            at: Utc::now(),
        }
    }

    /// Change focus/break lengths. A stopped timer redisplays the new
    /// default for its mode; a running one keeps counting.
    pub fn set_durations(&mut self, focus_min: u32, break_min: u32) -> Result<Event, ValidationError> {
        self.durations = Durations::new(focus_min, break_min, self.durations.test_secs)?;
        if !self.engine.is_running() {
            self.engine.reset(self.durations.default_secs(self.engine.mode()));
        }
        Ok(Event::DurationsChanged {
            focus_min,
            break_min,
            at: Utc::now(),
        })
    }

    /// Advance one second. On completion of a Work/Test interval the record
    /// is appended before returning; a failed append shows up as
    /// `SessionLogFailed` and leaves the timer stopped.
    pub async fn tick(&mut self) -> Vec<Event> {
        let Some(completed) = self.engine.tick() else {
            return Vec::new();
        };
        let mode = self.engine.mode();
        tracing::info!(%mode, "timer completed");

        let mut events = vec![completed];
        match self
            .recorder
            .record(&mut self.store, mode, &self.task_name, &self.durations)
            .await
        {
            Ok(Some(record)) => {
                tracing::info!(
                    backend = self.store.name(),
                    task = %record.task_name,
                    minutes = record.duration_min,
                    "session logged"
                );
                events.push(Event::SessionLogged {
                    record,
                    at: Utc::now(),
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(backend = self.store.name(), error = %e, "failed to log session");
                events.push(Event::SessionLogFailed {
                    mode,
                    error: e.to_string(),
                    at: Utc::now(),
                });
            }
        }
        events
    }
}
