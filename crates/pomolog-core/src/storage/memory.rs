use super::record::{newest_first, SessionRecord};
use super::LogStore;
use crate::error::StoreError;

/// In-process log. Backs `--dry-run` and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogStore {
    records: Vec<SessionRecord>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far, oldest first.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }
}

impl LogStore for MemoryLogStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    async fn read_recent(&self, n: usize) -> Vec<SessionRecord> {
        newest_first(self.records.clone(), n)
    }
}
