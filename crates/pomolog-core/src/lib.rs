//! # pomolog Core Library
//!
//! Core logic for pomolog, a work/break countdown timer that logs each
//! completed work session to an append-only log. The `pomolog` CLI is a thin
//! presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A seconds-granularity state machine advanced by
//!   `tick()`; completion fires exactly once per start
//! - **Session**: Owns engine, task name, durations and log store; records
//!   completed Work/Test intervals and is driven by an async runner
//! - **Storage**: The `LogStore` contract with SQLite, spreadsheet and
//!   in-memory backends, plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core countdown state machine
//! - [`FocusSession`]: Session context and command surface
//! - [`SessionRunner`]: One-second cadence and command handling
//! - [`LogStore`]: Append-only session log contract
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod history;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, StoreError, ValidationError};
pub use events::Event;
pub use history::{format_clock, HistoryTable};
pub use session::{Command, FocusSession, SessionRecorder, SessionRunner};
pub use storage::{
    BackendStore, Config, LogStore, MemoryLogStore, SessionRecord, SheetsLogStore,
    SqliteLogStore,
};
pub use timer::{Durations, IntervalTicker, TickSource, TimerEngine, TimerMode, TimerState};
