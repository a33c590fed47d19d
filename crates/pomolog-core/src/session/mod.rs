mod context;
mod recorder;
mod runner;

pub use context::FocusSession;
pub use recorder::{SessionRecorder, DEFAULT_TASK_NAME};
pub use runner::{Command, SessionRunner};
