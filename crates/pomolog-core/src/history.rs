//! Display helpers for the countdown and the recent-sessions view.

use std::fmt;

use crate::storage::{SessionRecord, HEADER};

/// Seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    let (mins, secs) = (seconds / 60, seconds % 60);
    format!("{mins:02}:{secs:02}")
}

/// Recent sessions as an aligned text table, in the order given.
pub struct HistoryTable<'a> {
    records: &'a [SessionRecord],
}

impl<'a> HistoryTable<'a> {
    pub fn new(records: &'a [SessionRecord]) -> Self {
        Self { records }
    }
}

impl fmt::Display for HistoryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            return writeln!(f, "No sessions logged yet.");
        }

        let rows: Vec<[String; 5]> = self.records.iter().map(SessionRecord::to_row).collect();
        let mut widths = HEADER.map(|h| h.chars().count());
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        write_row(f, &HEADER, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, &rule, &widths)?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, cells: &[S], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<w$}", cell.as_ref(), w = *w))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(90 * 60), "90:00");
        assert_eq!(format_clock(61), "01:01");
    }

    #[test]
    fn empty_history_has_placeholder_line() {
        assert_eq!(HistoryTable::new(&[]).to_string(), "No sessions logged yet.\n");
    }

    #[test]
    fn table_aligns_columns() {
        let records = vec![SessionRecord {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            time: NaiveTime::from_hms_opt(14, 2, 9).unwrap(),
            task_name: "Review the quarterly plan".into(),
            duration_min: 25.0,
            session_type: TimerMode::Work,
        }];
        let text = HistoryTable::new(&records).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date        Time      Task Name"));
        assert!(lines[2].starts_with("2026-10-16  14:02:09  Review the quarterly plan"));
        assert_eq!(
            lines[0].find("Duration (mins)"),
            lines[2].find("25")
        );
    }
}
