//! The session log row.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::timer::TimerMode;

/// Column headers of the session log, in storage order.
pub const HEADER: [&str; 5] = ["Date", "Time", "Task Name", "Duration (mins)", "Type"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// One completed Work or Test interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub task_name: String,
    pub duration_min: f64,
    /// Serialized as the `Type` column label (`Work`, `Test Run`).
    #[serde(rename = "type", with = "type_label")]
    pub session_type: TimerMode,
}

mod type_label {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::timer::TimerMode;

    pub fn serialize<S: Serializer>(mode: &TimerMode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(mode.label())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimerMode, D::Error> {
        let label = String::deserialize(deserializer)?;
        TimerMode::from_label(&label)
            .ok_or_else(|| D::Error::custom(format!("unknown session type '{label}'")))
    }
}

impl SessionRecord {
    /// Cells in [`HEADER`] order.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.time.format(TIME_FORMAT).to_string(),
            self.task_name.clone(),
            self.duration_min.to_string(),
            self.session_type.label().to_string(),
        ]
    }

    /// Parse a row in [`HEADER`] order. Extra trailing cells are ignored.
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, StoreError> {
        let cell = |i: usize| -> Result<&str, StoreError> {
            row.get(i)
                .map(|c| c.as_ref().trim())
                .ok_or_else(|| StoreError::Malformed(format!("missing '{}' column", HEADER[i])))
        };

        let (date_cell, time_cell, duration_cell) = (cell(0)?, cell(1)?, cell(3)?);
        let date = NaiveDate::parse_from_str(date_cell, DATE_FORMAT)
            .map_err(|e| StoreError::Malformed(format!("bad date '{date_cell}': {e}")))?;
        let time = NaiveTime::parse_from_str(time_cell, TIME_FORMAT)
            .map_err(|e| StoreError::Malformed(format!("bad time '{time_cell}': {e}")))?;
        let task_name = cell(2)?.to_string();
        let duration_min: f64 = duration_cell
            .parse()
            .map_err(|e| StoreError::Malformed(format!("bad duration '{duration_cell}': {e}")))?;
        if !duration_min.is_finite() || duration_min < 0.0 {
            return Err(StoreError::Malformed(format!(
                "duration must be non-negative, got {duration_min}"
            )));
        }
        let type_cell = cell(4)?;
        let session_type = TimerMode::from_label(type_cell)
            .ok_or_else(|| StoreError::Malformed(format!("unknown session type '{type_cell}'")))?;

        Ok(Self {
            date,
            time,
            task_name,
            duration_min,
            session_type,
        })
    }
}

/// Whether `row` is the header line (any revision of it).
pub fn is_header_row<S: AsRef<str>>(row: &[S]) -> bool {
    row.first().map(|c| c.as_ref().trim()) == Some(HEADER[0])
}

/// Take the last `n` of `records` (stored oldest first), newest first.
pub fn newest_first(records: Vec<SessionRecord>, n: usize) -> Vec<SessionRecord> {
    records.into_iter().rev().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(task: &str) -> SessionRecord {
        SessionRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            time: NaiveTime::from_hms_opt(9, 5, 7).unwrap(),
            task_name: task.to_string(),
            duration_min: 25.0,
            session_type: TimerMode::Work,
        }
    }

    #[test]
    fn row_uses_canonical_column_formats() {
        let row = record("Draft chapter").to_row();
        assert_eq!(row, ["2026-03-14", "09:05:07", "Draft chapter", "25", "Work"]);
    }

    #[test]
    fn test_run_row_has_fractional_minutes() {
        let mut rec = record("Check logging");
        rec.duration_min = 0.08;
        rec.session_type = TimerMode::Test;
        let row = rec.to_row();
        assert_eq!(row[3], "0.08");
        assert_eq!(row[4], "Test Run");
        assert_eq!(SessionRecord::from_row(&row).unwrap(), rec);
    }

    #[test]
    fn json_type_matches_column_label() {
        let mut rec = record("Check logging");
        rec.session_type = TimerMode::Test;
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "Test Run");
        assert_eq!(json["date"], "2026-03-14");

        let back: SessionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);

        let mut bad = serde_json::to_value(record("x")).unwrap();
        bad["type"] = "Nap".into();
        assert!(serde_json::from_value::<SessionRecord>(bad).is_err());
    }

    #[test]
    fn rejects_short_and_garbled_rows() {
        assert!(SessionRecord::from_row(&["2026-03-14", "09:05:07"]).is_err());
        assert!(SessionRecord::from_row(&["14/03/2026", "09:05:07", "x", "25", "Work"]).is_err());
        assert!(SessionRecord::from_row(&["2026-03-14", "09:05:07", "x", "-1", "Work"]).is_err());
        assert!(SessionRecord::from_row(&["2026-03-14", "09:05:07", "x", "25", "Nap"]).is_err());
    }

    #[test]
    fn header_detection_ignores_duration_column_name() {
        assert!(is_header_row(&HEADER));
        assert!(is_header_row(&["Date", "Time", "Task Name", "Duration", "Type"]));
        assert!(!is_header_row(&record("x").to_row()));
    }

    #[test]
    fn newest_first_takes_tail_reversed() {
        let records: Vec<_> = (1..=7).map(|i| record(&format!("task {i}"))).collect();
        let names: Vec<_> = newest_first(records, 5)
            .into_iter()
            .map(|r| r.task_name)
            .collect();
        assert_eq!(names, ["task 7", "task 6", "task 5", "task 4", "task 3"]);
    }
}
