//! Drives a [`FocusSession`] from a tick source and a command channel.
//!
//! Commands are applied as soon as they arrive; ticks are only awaited
//! while the countdown runs. Each batch of events is followed by a
//! `StateSnapshot` so the presentation layer can redraw.

use chrono::Utc;
use tokio::sync::mpsc;

use super::context::FocusSession;
use crate::events::Event;
use crate::storage::LogStore;
use crate::timer::{TickSource, TimerMode};

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start(TimerMode),
    Reset,
    SetTaskName(String),
    SetDurations { focus_min: u32, break_min: u32 },
    Quit,
}

pub struct SessionRunner<S, T> {
    session: FocusSession<S>,
    ticker: T,
    exit_on_completion: bool,
}

impl<S: LogStore, T: TickSource> SessionRunner<S, T> {
    pub fn new(session: FocusSession<S>, ticker: T) -> Self {
        Self {
            session,
            ticker,
            exit_on_completion: false,
        }
    }

    /// Stop after the first countdown completes instead of waiting for `Quit`.
    pub fn exit_on_completion(mut self, exit: bool) -> Self {
        self.exit_on_completion = exit;
        self
    }

    /// Run until `Quit`, the command channel closes, or (if configured) the
    /// first completion. Returns the session for inspection.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        events: mpsc::UnboundedSender<Event>,
    ) -> FocusSession<S> {
        let _ = events.send(self.session.snapshot());

        loop {
            let running = self.session.state().running;
            let batch = tokio::select! {
                cmd = commands.recv() => match cmd {
                    None | Some(Command::Quit) => {
                        tracing::debug!("session runner stopping");
                        break;
                    }
                    Some(cmd) => self.apply(cmd),
                },
                () = self.ticker.next_tick(), if running => self.session.tick().await,
            };

            let completed = batch.iter().any(Event::is_completion);
            for event in batch {
                let _ = events.send(event);
            }
            let _ = events.send(self.session.snapshot());

            if completed && self.exit_on_completion {
                break;
            }
        }

        self.session
    }

    fn apply(&mut self, cmd: Command) -> Vec<Event> {
        match cmd {
            Command::Start(mode) => {
                self.ticker.restart();
                vec![self.session.start(mode)]
            }
            Command::Reset => vec![self.session.reset()],
            Command::SetTaskName(name) => vec![self.session.set_task_name(name)],
            Command::SetDurations {
                focus_min,
                break_min,
            } => match self.session.set_durations(focus_min, break_min) {
                Ok(event) => vec![event],
                Err(e) => {
                    tracing::warn!(error = %e, "durations rejected");
                    vec![Event::CommandRejected {
                        reason: e.to_string(),
                        at: Utc::now(),
                    }]
                }
            },
            // Handled by the run loop.
            Command::Quit => Vec::new(),
        }
    }
}
