//! Countdown engine.
//!
//! A seconds-granularity state machine. It owns no thread and no timer;
//! whoever drives it calls `tick()` once per second (see
//! [`SessionRunner`](crate::session::SessionRunner)).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Completed (transient) -> Idle
//!   ^                                          |
//!   +------------------ reset -----------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerMode::Work, 25 * 60);
//! engine.start(TimerMode::Work, 25 * 60);
//! // once per second:
//! engine.tick(); // Returns Some(Event::TimerCompleted) exactly once
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use crate::events::Event;
use crate::history::format_clock;

/// Value snapshot of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub running: bool,
}

/// Core countdown engine.
///
/// The `running` flag doubles as the completion latch: it is cleared in the
/// same step that emits `TimerCompleted`, and a stopped engine ignores ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    /// Create an idle engine showing `default_secs` for `mode`.
    pub fn new(mode: TimerMode, default_secs: u64) -> Self {
        Self {
            state: TimerState {
                mode,
                remaining_secs: default_secs,
                running: false,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, task_name: &str) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            running: self.state.running,
            display: format_clock(self.state.remaining_secs),
            task_name: task_name.to_string(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down `duration_secs` in `mode`. Restarts if already running.
    pub fn start(&mut self, mode: TimerMode, duration_secs: u64) -> Event {
        self.state = TimerState {
            mode,
            remaining_secs: duration_secs,
            running: true,
        };
        Event::TimerStarted {
            mode,
            duration_secs,
            at: Utc::now(),
        }
    }

    /// Stop and show `default_secs` for the current mode. Never completes.
    pub fn reset(&mut self, default_secs: u64) -> Event {
        self.state.running = false;
        self.state.remaining_secs = default_secs;
        Event::TimerReset {
            mode: self.state.mode,
            remaining_secs: default_secs,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some(Event::TimerCompleted)` on the tick
    /// that reaches zero; a stopped engine returns `None` and stays unchanged.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        if self.state.remaining_secs > 0 {
            return None;
        }
        self.state.running = false;
        Some(Event::TimerCompleted {
            mode: self.state.mode,
            at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn completions(engine: &mut TimerEngine, ticks: u64) -> usize {
        (0..ticks).filter_map(|_| engine.tick()).count()
    }

    #[test]
    fn new_engine_is_idle() {
        let engine = TimerEngine::new(TimerMode::Work, 1500);
        assert_eq!(
            engine.state(),
            TimerState {
                mode: TimerMode::Work,
                remaining_secs: 1500,
                running: false
            }
        );
    }

    #[test]
    fn two_second_work_completes_on_second_tick() {
        let mut engine = TimerEngine::new(TimerMode::Work, 1500);
        engine.start(TimerMode::Work, 2);
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 1);
        match engine.tick() {
            Some(Event::TimerCompleted { mode, .. }) => assert_eq!(mode, TimerMode::Work),
            other => panic!("expected TimerCompleted, got {other:?}"),
        }
        assert_eq!(engine.remaining_secs(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut engine = TimerEngine::new(TimerMode::Test, 5);
        engine.start(TimerMode::Test, 0);
        assert!(engine.is_running());
        assert!(engine.tick().is_some());
        assert!(engine.tick().is_none());
        assert!(!engine.is_running());
    }

    #[test]
    fn tick_while_idle_is_noop() {
        let mut engine = TimerEngine::new(TimerMode::Break, 300);
        let before = engine.state();
        assert!(engine.tick().is_none());
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn reset_mid_run_stops_without_completion() {
        let mut engine = TimerEngine::new(TimerMode::Work, 1500);
        engine.start(TimerMode::Work, 10);
        engine.tick();
        let event = engine.reset(1500);
        assert!(!event.is_completion());
        assert_eq!(engine.remaining_secs(), 1500);
        assert!(!engine.is_running());
        assert_eq!(completions(&mut engine, 20), 0);
    }

    #[test]
    fn restart_after_completion_fires_again() {
        let mut engine = TimerEngine::new(TimerMode::Work, 1500);
        engine.start(TimerMode::Work, 1);
        assert_eq!(completions(&mut engine, 3), 1);
        engine.start(TimerMode::Break, 1);
        assert_eq!(completions(&mut engine, 3), 1);
        assert_eq!(engine.mode(), TimerMode::Break);
    }

    #[test]
    fn snapshot_formats_remaining_time() {
        let engine = TimerEngine::new(TimerMode::Work, 25 * 60);
        match engine.snapshot("Write report") {
            Event::StateSnapshot {
                display,
                running,
                task_name,
                ..
            } => {
                assert_eq!(display, "25:00");
                assert!(!running);
                assert_eq!(task_name, "Write report");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn exactly_one_completion_per_start(duration in 0u64..600, extra in 0u64..50) {
            let mut engine = TimerEngine::new(TimerMode::Work, 1500);
            engine.start(TimerMode::Work, duration);
            let needed = duration.max(1);
            prop_assert_eq!(completions(&mut engine, needed), 1);
            prop_assert!(!engine.is_running());
            prop_assert_eq!(engine.remaining_secs(), 0);
            prop_assert_eq!(completions(&mut engine, extra), 0);
        }

        #[test]
        fn reset_always_returns_to_default(duration in 0u64..600, ticks in 0u64..700, default in 0u64..5400) {
            let mut engine = TimerEngine::new(TimerMode::Work, default);
            engine.start(TimerMode::Work, duration);
            completions(&mut engine, ticks);
            engine.reset(default);
            prop_assert_eq!(engine.remaining_secs(), default);
            prop_assert!(!engine.is_running());
        }
    }
}
