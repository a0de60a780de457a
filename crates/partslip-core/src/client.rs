//! HTTP loading of schedule sheets.
//!
//! `SheetClient` fetches the CSV body for a `SheetSource`; `load_text` runs
//! the pipeline over a body that is already in hand (file, stdin or a
//! completed fetch).

use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, info, warn};

use crate::csv::{self, row_is_blank};
use crate::dates::{CrossMonthStyle, DateTransliterator};
use crate::error::LoadError;
use crate::extract::{Extractor, SlotFilter};
use crate::models::Schedule;
use crate::source::SheetSource;

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Prefix the sheet proxy script puts in front of its error text.
const PROXY_ERROR_PREFIX: &str = "Error:";

/// A sheet needs a header row plus at least one data row.
const MIN_DATA_ROWS: usize = 2;

/// How a fetched sheet is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub slot_filter: SlotFilter,
    pub cross_month: CrossMonthStyle,
}

impl LoadOptions {
    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.slot_filter, DateTransliterator::new(self.cross_month))
    }
}

/// Reject bodies carrying the proxy's error sentinel.
pub fn check_proxy_sentinel(body: &str) -> Result<&str, LoadError> {
    match body.strip_prefix(PROXY_ERROR_PREFIX) {
        Some(detail) => Err(LoadError::ProxyReported(detail.trim().to_string())),
        None => Ok(body),
    }
}

/// Run the pipeline over a CSV body.
pub fn load_text(body: &str, options: &LoadOptions) -> Result<Schedule, LoadError> {
    let body = check_proxy_sentinel(body)?;
    let grid = csv::parse(body);

    let data_rows = grid.iter().filter(|row| !row_is_blank(row)).count();
    if data_rows < MIN_DATA_ROWS {
        return Err(LoadError::EmptySheet);
    }

    let records = options.extractor().extract(&grid);
    info!(rows = grid.len(), records = records.len(), "Loaded schedule");
    Ok(Schedule::new(records))
}

/// Run the pipeline over raw bytes, e.g. a file read from disk.
pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Schedule, LoadError> {
    load_text(csv::decode_text(bytes)?, options)
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
}

impl SheetClient {
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch the raw CSV body for a source.
    pub async fn fetch_text(&self, source: &SheetSource) -> Result<String, LoadError> {
        let url = source.csv_url();
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            debug!(url = %url, "Fetching sheet");
            let response = self
                .client
                .get(&url)
                .header(header::ACCEPT, "text/csv, text/plain;q=0.9, */*;q=0.5")
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.text().await?);
            }

            if status.as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(LoadError::RateLimited);
                }
                warn!(url = %url, retry = retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::from_status(status, &body));
        }
    }

    /// Fetch and interpret a sheet.
    pub async fn load(
        &self,
        source: &SheetSource,
        options: &LoadOptions,
    ) -> Result<Schedule, LoadError> {
        info!(%source, "Loading schedule");
        let body = self.fetch_text(source).await?;
        load_text(&body, options)
    }
}
