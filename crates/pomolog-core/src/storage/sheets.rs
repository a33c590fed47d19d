//! Spreadsheet-backed session log.
//!
//! Talks to a spreadsheet values API (Google Sheets v4 shape): one sheet,
//! columns A to E in [`HEADER`] order, header in row 1. Only reads ranges,
//! writes the header and appends rows.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::config::SheetsConfig;
use super::record::{is_header_row, newest_first, SessionRecord, HEADER};
use super::LogStore;
use crate::error::StoreError;

/// Session log kept in a remote spreadsheet.
pub struct SheetsLogStore {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    sheet_name: String,
    token: Option<String>,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl SheetsLogStore {
    /// Build a client from config, reading the bearer token from the
    /// environment variable named by `token_env`.
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self::with_token(config, token)
    }

    pub fn with_token(config: &SheetsConfig, token: Option<String>) -> Result<Self, StoreError> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(StoreError::Unreachable(
                "sheets.spreadsheet_id is not configured".into(),
            ));
        }
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            StoreError::Unreachable(format!("invalid sheets.base_url '{}': {e}", config.base_url))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            token,
            timeout_secs: config.timeout_secs,
        })
    }

    fn range(&self, cells: &str) -> String {
        format!("{}!{cells}", urlencoding::encode(&self.sheet_name))
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{range}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(&self.spreadsheet_id),
        )
    }

    fn token(&self) -> Result<&str, StoreError> {
        self.token
            .as_deref()
            .ok_or_else(|| StoreError::Auth("no spreadsheet access token configured".into()))
    }

    fn request_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            StoreError::from(err)
        }
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Auth(format!(
                "HTTP {}: {body}",
                status.as_u16()
            ))),
            _ => Err(StoreError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    async fn get_values(&self, cells: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self
            .client
            .get(self.values_url(&self.range(cells)))
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let range: ValueRange = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| self.request_error(e))?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn fetch_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let rows = self.get_values("A:E").await?;
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.iter().all(|c| c.trim().is_empty()) || (i == 0 && is_header_row(row)) {
                continue;
            }
            match SessionRecord::from_row(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(row = i + 1, error = %e, "skipping unreadable log row"),
            }
        }
        Ok(records)
    }
}

fn cell_text(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl LogStore for SheetsLogStore {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        let first = self.get_values("A1:E1").await?;
        match first.first() {
            Some(row) if is_header_row(row) => {
                if row.iter().map(String::as_str).ne(HEADER) {
                    tracing::warn!(found = ?row, expected = ?HEADER, "log header differs from canonical columns");
                }
                Ok(())
            }
            Some(row) if !row.iter().all(|c| c.trim().is_empty()) => {
                tracing::warn!(found = ?row, "row 1 holds data, not a header; leaving it alone");
                Ok(())
            }
            _ => {
                let url = format!("{}?valueInputOption=RAW", self.values_url(&self.range("A1:E1")));
                let response = self
                    .client
                    .put(url)
                    .bearer_auth(self.token()?)
                    .json(&json!({ "values": [HEADER] }))
                    .send()
                    .await
                    .map_err(|e| self.request_error(e))?;
                Self::check(response).await?;
                tracing::info!(sheet = %self.sheet_name, "wrote log header");
                Ok(())
            }
        }
    }

    async fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(&self.range("A:E"))
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token()?)
            .json(&json!({ "values": [record.to_row()] }))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn read_recent(&self, n: usize) -> Vec<SessionRecord> {
        match self.fetch_all().await {
            Ok(records) => newest_first(records, n),
            Err(e) => {
                tracing::warn!(error = %e, "could not read session history from spreadsheet");
                Vec::new()
            }
        }
    }
}
