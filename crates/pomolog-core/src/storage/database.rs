//! SQLite-based session log.
//!
//! Keeps the five log columns in a `sessions` table; the autoincrement id
//! fixes insertion order. Also answers the summary numbers shown by
//! `pomolog stats`.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveTime};
use indoc::indoc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::record::{SessionRecord, DATE_FORMAT, TIME_FORMAT};
use super::LogStore;
use crate::error::StoreError;
use crate::timer::TimerMode;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_minutes: f64,
    pub today_sessions: u64,
    pub today_minutes: f64,
    pub test_runs: u64,
}

/// SQLite database for session storage.
pub struct SqliteLogStore {
    conn: Connection,
}

impl SqliteLogStore {
    /// Open the database at `<data dir>/pomolog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::Unreachable(e.to_string()))?;
        Self::open_at(dir.join("pomolog.db"))
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(indoc! {"
            CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                date         TEXT NOT NULL,
                time         TEXT NOT NULL,
                task_name    TEXT NOT NULL,
                duration_min REAL NOT NULL,
                session_type TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
        "})
    }

    fn insert(&self, record: &SessionRecord) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO sessions (date, time, task_name, duration_min, session_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.date.format(DATE_FORMAT).to_string(),
                record.time.format(TIME_FORMAT).to_string(),
                record.task_name,
                record.duration_min,
                record.session_type.label(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query_recent(&self, n: usize) -> Result<Vec<SessionRecord>, StoreError> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT date, time, task_name, duration_min, session_type
             FROM sessions
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (date, time, task_name, duration_min, session_type) = row?;
            records.push(SessionRecord {
                date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
                    .map_err(|e| StoreError::Malformed(format!("bad date '{date}': {e}")))?,
                time: NaiveTime::parse_from_str(&time, TIME_FORMAT)
                    .map_err(|e| StoreError::Malformed(format!("bad time '{time}': {e}")))?,
                task_name,
                duration_min,
                session_type: TimerMode::from_label(&session_type).ok_or_else(|| {
                    StoreError::Malformed(format!("unknown session type '{session_type}'"))
                })?,
            });
        }
        Ok(records)
    }

    /// Totals across the whole log plus today's share.
    pub fn stats(&self) -> Result<Stats, StoreError> {
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        let mut stmt = self.conn.prepare(
            "SELECT session_type, date = ?1, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions
             GROUP BY session_type, date = ?1",
        )?;
        let rows = stmt.query_map(params![today], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut stats = Stats::default();
        for row in rows {
            let (session_type, is_today, count, minutes) = row?;
            let count = u64::try_from(count).unwrap_or(0);
            stats.total_sessions += count;
            stats.total_minutes += minutes;
            if is_today {
                stats.today_sessions += count;
                stats.today_minutes += minutes;
            }
            if TimerMode::from_label(&session_type) == Some(TimerMode::Test) {
                stats.test_runs += count;
            }
        }
        Ok(stats)
    }
}

impl LogStore for SqliteLogStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.migrate()?;
        Ok(())
    }

    async fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        let id = self.insert(record)?;
        tracing::debug!(id, task = %record.task_name, "session row inserted");
        Ok(())
    }

    async fn read_recent(&self, n: usize) -> Vec<SessionRecord> {
        match self.query_recent(n) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "could not read session history");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(task: &str, date: NaiveDate, mode: TimerMode, minutes: f64) -> SessionRecord {
        SessionRecord {
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            task_name: task.to_string(),
            duration_min: minutes,
            session_type: mode,
        }
    }

    #[tokio::test]
    async fn append_and_read_back_newest_first() {
        let mut db = SqliteLogStore::open_memory().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        for i in 1..=7 {
            db.append(&record(&format!("task {i}"), day, TimerMode::Work, 25.0))
                .await
                .unwrap();
        }
        let names: Vec<_> = db
            .read_recent(5)
            .await
            .into_iter()
            .map(|r| r.task_name)
            .collect();
        assert_eq!(names, ["task 7", "task 6", "task 5", "task 4", "task 3"]);
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let mut db = SqliteLogStore::open_memory().unwrap();
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
        assert!(db.read_recent(5).await.is_empty());
    }

    #[tokio::test]
    async fn stats_split_today_from_history() {
        let mut db = SqliteLogStore::open_memory().unwrap();
        let today = Local::now().date_naive();
        let long_ago = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        db.append(&record("a", long_ago, TimerMode::Work, 25.0)).await.unwrap();
        db.append(&record("b", today, TimerMode::Work, 50.0)).await.unwrap();
        db.append(&record("c", today, TimerMode::Test, 0.08)).await.unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.today_sessions, 2);
        assert_eq!(stats.test_runs, 1);
        assert!((stats.total_minutes - 75.08).abs() < 1e-9);
        assert!((stats.today_minutes - 50.08).abs() < 1e-9);
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        {
            let mut db = SqliteLogStore::open_at(&path).unwrap();
            db.append(&record("kept", day, TimerMode::Work, 25.0)).await.unwrap();
        }
        let db = SqliteLogStore::open_at(&path).unwrap();
        let recent = db.read_recent(5).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].task_name, "kept");
    }
}
