use std::io::{BufRead, Write};

use clap::Subcommand;
use pomolog_core::{
    BackendStore, Command, Config, Event, FocusSession, IntervalTicker, LogStore, SessionRunner,
    TimerMode,
};
use tokio::sync::mpsc;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground
    ///
    /// While running, stdin accepts one command per line: `start <mode>`,
    /// `reset`, `task <name>`, `durations <focus> <break>`, `quit`.
    Run {
        /// Mode to start in (work, break, test)
        #[arg(long, default_value = "work")]
        mode: TimerMode,
        /// Task name recorded with the session
        #[arg(long)]
        task: Option<String>,
        /// Keep running after the first completion until `quit` or Ctrl-C
        #[arg(long)]
        keep_going: bool,
        /// Log to memory only; nothing is persisted
        #[arg(long)]
        dry_run: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            mode,
            task,
            keep_going,
            dry_run,
            json,
        } => {
            let config = Config::load()?;
            let mut store = if dry_run {
                BackendStore::memory()
            } else {
                BackendStore::from_config(&config)?
            };
            if let Err(e) = store.ensure_schema().await {
                eprintln!("warning: log store not ready ({e}); sessions may not be saved");
            }

            let mut session = FocusSession::from_config(store, &config)?;
            if let Some(name) = task {
                session.set_task_name(name);
            }

            let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
            let (ev_tx, ev_rx) = mpsc::unbounded_channel();
            cmd_tx.send(Command::Start(mode))?;
            spawn_stdin_reader(cmd_tx.clone());
            spawn_ctrl_c(cmd_tx);

            let printer = Printer {
                json,
                bell: config.ui.sound != "none",
            };
            let runner = SessionRunner::new(session, IntervalTicker::new()).exit_on_completion(!keep_going);
            let (_, printed) = tokio::join!(runner.run(cmd_rx, ev_tx), printer.drain(ev_rx));
            printed?;
        }
    }
    Ok(())
}

/// Parse one stdin line into a runner command.
fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match word {
        "start" => {
            let mode = if rest.is_empty() { "work" } else { rest };
            mode.parse().map(Command::Start).map_err(|e| format!("{e}"))
        }
        "reset" => Ok(Command::Reset),
        "task" => Ok(Command::SetTaskName(rest.to_string())),
        "durations" => {
            let mut parts = rest.split_whitespace().map(str::parse::<u32>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(focus_min)), Some(Ok(break_min)), None) => Ok(Command::SetDurations {
                    focus_min,
                    break_min,
                }),
                _ => Err("usage: durations <focus minutes> <break minutes>".into()),
            }
        }
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}

/// Blocking reads on a dedicated thread so an idle stdin never holds up exit.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<Command>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Err(msg) => eprintln!("{msg}"),
            }
        }
        tracing::debug!("stdin closed");
    });
}

fn spawn_ctrl_c(tx: mpsc::UnboundedSender<Command>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Command::Quit);
        }
    });
}

struct Printer {
    json: bool,
    bell: bool,
}

impl Printer {
    async fn drain(self, mut events: mpsc::UnboundedReceiver<Event>) -> Result<(), std::io::Error> {
        let mut out = std::io::stdout();
        while let Some(event) = events.recv().await {
            if self.json {
                writeln!(out, "{}", serde_json::to_string(&event)?)?;
            } else {
                self.print_line(&mut out, &event)?;
            }
            out.flush()?;
        }
        if !self.json {
            writeln!(out)?;
        }
        Ok(())
    }

    fn print_line(&self, out: &mut impl Write, event: &Event) -> std::io::Result<()> {
        match event {
            Event::StateSnapshot {
                mode,
                display,
                task_name,
                running,
                ..
            } => {
                let status = if *running { "" } else { " (stopped)" };
                write!(out, "\r\x1b[2K{mode:<8} {display}  {task_name}{status}")
            }
            Event::TimerStarted { mode, .. } => writeln!(out, "\r\x1b[2K{mode} started"),
            Event::TimerCompleted { mode, .. } => {
                let bell = if self.bell { "\x07" } else { "" };
                writeln!(out, "\r\x1b[2K{mode} complete{bell}")
            }
            Event::TimerReset { .. } => writeln!(out, "\r\x1b[2Ktimer reset"),
            Event::SessionLogged { record, .. } => writeln!(
                out,
                "\r\x1b[2Klogged {} min of \"{}\"",
                record.duration_min, record.task_name
            ),
            Event::SessionLogFailed { error, .. } => {
                eprintln!("\rwarning: session not logged: {error}");
                Ok(())
            }
            Event::CommandRejected { reason, .. } => {
                eprintln!("\rrejected: {reason}");
                Ok(())
            }
            Event::TaskRenamed { .. } | Event::DurationsChanged { .. } => Ok(()),
        }
    }
}
