mod engine;
mod mode;
mod ticker;

pub use engine::{TimerEngine, TimerState};
pub use mode::{Durations, TimerMode, BREAK_RANGE, FOCUS_RANGE};
pub use ticker::{IntervalTicker, TickSource};
