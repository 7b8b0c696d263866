//! Spreadsheet values API source.
//!
//! One blocking `GET` per refresh:
//! `https://sheets.googleapis.com/v4/spreadsheets/{id}/values/{range}?key={api_key}`

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::ingest::records_from_rows;
use super::model::{Cell, Dataset};
use super::RowSource;
use crate::error::IngestError;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DEFAULT_RANGE: &str = "Sheet1!A:L";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where to read the sheet from and how to authenticate.
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    pub range: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_key", &"<redacted>")
            .field("range", &self.range)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SheetsConfig {
    pub fn new(spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        SheetsConfig {
            spreadsheet_id: sanitize(&spreadsheet_id.into()),
            api_key: sanitize(&api_key.into()),
            range: DEFAULT_RANGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// * `SPREADSHEET_ID` (or `REACT_APP_SPREADSHEET_ID`)
    /// * `GOOGLE_API_KEY` (or `REACT_APP_GOOGLE_API_KEY`)
    /// * `SHEETS_RANGE`, optional, defaults to `Sheet1!A:L`
    pub fn from_env() -> Result<Self, IngestError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`SheetsConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IngestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|n| lookup(*n))
                .map(|v| sanitize(&v))
                .find(|v| !v.is_empty())
        };

        let spreadsheet_id = first(&["SPREADSHEET_ID", "REACT_APP_SPREADSHEET_ID"])
            .ok_or(IngestError::MissingConfig { var: "SPREADSHEET_ID" })?;
        let api_key = first(&["GOOGLE_API_KEY", "REACT_APP_GOOGLE_API_KEY"])
            .ok_or(IngestError::MissingConfig { var: "GOOGLE_API_KEY" })?;

        let mut config = SheetsConfig::new(spreadsheet_id, api_key);
        if let Some(range) = first(&["SHEETS_RANGE"]) {
            config.range = range;
        }
        Ok(config)
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request URL without the key; the key travels as a query parameter.
    pub fn values_url(&self) -> String {
        format!("{API_BASE}/{}/values/{}", self.spreadsheet_id, self.range)
    }
}

/// Values pasted into `.env` files often keep their quotes or a trailing `;`.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '\'' && *c != ';')
        .collect::<String>()
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Response body
// ---------------------------------------------------------------------------

/// Body of a `values.get` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Absent when the requested range is empty.
    #[serde(default)]
    pub values: Vec<Vec<JsonValue>>,
}

impl ValueRange {
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.values
            .iter()
            .map(|row| row.iter().map(Cell::from).collect())
            .collect()
    }
}

/// Parse a response body into a dataset.
pub fn parse_value_range(body: &str) -> Result<Dataset> {
    let value_range: ValueRange =
        serde_json::from_str(body).context("parsing values response")?;
    if let Some(dim) = value_range.major_dimension.as_deref() {
        if dim != "ROWS" {
            bail!("unsupported majorDimension {dim:?}; expected ROWS");
        }
    }
    log::debug!(
        "range {} returned {} rows; first rows: {:?}",
        value_range.range,
        value_range.values.len(),
        value_range.values.iter().take(3).collect::<Vec<_>>()
    );
    let rows = value_range.into_rows();
    Ok(records_from_rows(&rows)?)
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Row source backed by the spreadsheet values API.
pub struct SheetsSource {
    config: SheetsConfig,
    client: Client,
}

impl SheetsSource {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("building HTTP client")?;
        Ok(SheetsSource { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SheetsConfig::from_env()?)
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }
}

impl RowSource for SheetsSource {
    fn load(&self) -> Result<Dataset> {
        let url = self.config.values_url();
        log::info!(
            "fetching spreadsheet {} range {} (API key {})",
            self.config.spreadsheet_id,
            self.config.range,
            if self.config.api_key.is_empty() { "not set" } else { "set" }
        );

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .map_err(|e| e.without_url())
            .with_context(|| format!("requesting {url}"))?;

        let status = response.status();
        log::debug!("response status {status}");
        let body = response.text().context("reading response body")?;
        if !status.is_success() {
            bail!("spreadsheet request failed with {status}: {body}");
        }

        let dataset = parse_value_range(&body)?;
        log::info!("fetched {} records", dataset.len());
        Ok(dataset)
    }
}
