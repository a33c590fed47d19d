use super::config::{Config, LogBackend};
use super::database::SqliteLogStore;
use super::memory::MemoryLogStore;
use super::record::SessionRecord;
use super::sheets::SheetsLogStore;
use super::LogStore;
use crate::error::StoreError;

/// Whichever store the configuration selects.
pub enum BackendStore {
    Memory(MemoryLogStore),
    Sqlite(SqliteLogStore),
    Sheets(SheetsLogStore),
}

impl BackendStore {
    /// Open the backend named by `log.backend`.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store = match config.log.backend {
            LogBackend::Sqlite => BackendStore::Sqlite(SqliteLogStore::open()?),
            LogBackend::Sheets => BackendStore::Sheets(SheetsLogStore::new(&config.sheets)?),
        };
        tracing::debug!(backend = store.name(), "log store opened");
        Ok(store)
    }

    pub fn memory() -> Self {
        BackendStore::Memory(MemoryLogStore::new())
    }

    /// The SQLite store, when that is the active backend.
    pub fn as_sqlite(&self) -> Option<&SqliteLogStore> {
        match self {
            BackendStore::Sqlite(db) => Some(db),
            _ => None,
        }
    }
}

impl LogStore for BackendStore {
    fn name(&self) -> &'static str {
        match self {
            BackendStore::Memory(s) => s.name(),
            BackendStore::Sqlite(s) => s.name(),
            BackendStore::Sheets(s) => s.name(),
        }
    }

    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        match self {
            BackendStore::Memory(s) => s.ensure_schema().await,
            BackendStore::Sqlite(s) => s.ensure_schema().await,
            BackendStore::Sheets(s) => s.ensure_schema().await,
        }
    }

    async fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        match self {
            BackendStore::Memory(s) => s.append(record).await,
            BackendStore::Sqlite(s) => s.append(record).await,
            BackendStore::Sheets(s) => s.append(record).await,
        }
    }

    async fn read_recent(&self, n: usize) -> Vec<SessionRecord> {
        match self {
            BackendStore::Memory(s) => s.read_recent(n).await,
            BackendStore::Sqlite(s) => s.read_recent(n).await,
            BackendStore::Sheets(s) => s.read_recent(n).await,
        }
    }
}
