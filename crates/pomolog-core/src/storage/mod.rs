mod backend;
mod config;
pub mod database;
mod memory;
pub mod record;
pub mod sheets;

pub use backend::BackendStore;
pub use config::{Config, LogBackend, LogConfig, SheetsConfig, TaskConfig, TimerConfig, UiConfig};
pub use database::{SqliteLogStore, Stats};
pub use memory::MemoryLogStore;
pub use record::{SessionRecord, HEADER};
pub use sheets::SheetsLogStore;

use std::future::Future;
use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};

/// Append-only sink for completed sessions.
///
/// Insertion order is temporal order. Appends are not idempotent: calling
/// `append` twice with the same record stores it twice.
pub trait LogStore {
    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Create the header/table if missing. Safe to call repeatedly.
    fn ensure_schema(&mut self) -> impl Future<Output = Result<(), StoreError>>;

    /// Add one record after all existing ones.
    fn append(&mut self, record: &SessionRecord) -> impl Future<Output = Result<(), StoreError>>;

    /// Up to `n` most recent records, newest first.
    ///
    /// An empty or unreachable store yields an empty list; failures are
    /// logged, never returned.
    fn read_recent(&self, n: usize) -> impl Future<Output = Vec<SessionRecord>>;
}

/// Returns `~/.config/pomolog[-dev]/` based on POMOLOG_ENV.
///
/// Set POMOLOG_ENV=dev to use development data directory. POMOLOG_HOME
/// replaces the whole path.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOLOG_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOLOG_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomolog-dev")
            } else {
                base_dir.join("pomolog")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
