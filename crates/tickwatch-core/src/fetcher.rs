//! Market data fetcher.
//!
//! One pull per user interaction, no retries. Every upstream failure mode —
//! transport error, non-2xx status, unknown symbol, unparseable body, empty
//! result set — converges to [`FetchOutcome::NoData`] at the public
//! boundary. Failures are logged for diagnostics and never escape to the
//! caller as raw errors.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::http::{HttpClient, HttpError, HttpRequest};
use crate::table::{CellValue, FieldColumn};
use crate::{Bar, LookbackWindow, PriceSeries, Symbol, UtcDateTime};

/// Internal fetch failure. Converged to `NoData` before leaving the module.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] HttpError),
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },
    #[error("malformed chart payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("upstream chart error: {message}")]
    Chart { message: String },
    #[error("chart result missing {what}")]
    MissingSection { what: &'static str },
}

/// The one logical upstream operation: tabular rows for a symbol over a
/// half-open date range, or an error.
pub trait ChartSource: Send + Sync {
    fn download<'a>(
        &'a self,
        symbol: &'a Symbol,
        start: UtcDateTime,
        end: UtcDateTime,
    ) -> Pin<Box<dyn Future<Output = Result<ChartPage, FetchError>> + Send + 'a>>;
}

/// Raw rows handed back by a [`ChartSource`]: columns already flattened to a
/// single level, cells not yet coerced to scalars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartPage {
    pub timestamps: Vec<i64>,
    pub open: Vec<Option<CellValue>>,
    pub high: Vec<Option<CellValue>>,
    pub low: Vec<Option<CellValue>>,
    pub close: Vec<Option<CellValue>>,
}

/// Outcome of one fetch: a usable series or nothing. There is no in-between.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Series(SeriesFetch),
    NoData,
}

/// A successfully fetched series plus any recovered numeric-coercion
/// reports. Warnings do not invalidate the series; they flag cells that had
/// to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFetch {
    pub series: PriceSeries,
    pub warnings: Vec<String>,
}

/// Daily-bar source backed by the Yahoo Finance chart API.
pub struct YahooChartSource {
    http: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl YahooChartSource {
    pub fn new(http: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    fn endpoint(symbol: &Symbol, start: UtcDateTime, end: UtcDateTime) -> String {
        format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            urlencoding::encode(symbol.as_str()),
            start.unix_timestamp(),
            end.unix_timestamp()
        )
    }
}

impl ChartSource for YahooChartSource {
    fn download<'a>(
        &'a self,
        symbol: &'a Symbol,
        start: UtcDateTime,
        end: UtcDateTime,
    ) -> Pin<Box<dyn Future<Output = Result<ChartPage, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(Self::endpoint(symbol, start, end))
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout(self.timeout);

            let response = self.http.execute(request).await?;
            if !response.is_success() {
                return Err(FetchError::UpstreamStatus {
                    status: response.status,
                });
            }

            parse_chart_body(&response.body)
        })
    }
}

/// Parse the chart JSON into flat columns, resolving the tagged-column shape
/// once here rather than at each access site.
fn parse_chart_body(body: &str) -> Result<ChartPage, FetchError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(fault) = envelope.chart.error {
        return Err(FetchError::Chart {
            message: fault
                .description
                .or(fault.code)
                .unwrap_or_else(|| String::from("unspecified upstream error")),
        });
    }

    let result = envelope
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(FetchError::MissingSection { what: "result" })?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or(FetchError::MissingSection {
            what: "quote indicators",
        })?;

    Ok(ChartPage {
        timestamps: result.timestamp.unwrap_or_default(),
        open: quote.open.flatten(),
        high: quote.high.flatten(),
        low: quote.low.flatten(),
        close: quote.close.flatten(),
    })
}

/// Fetches and normalizes one symbol's daily bars over a lookback window.
pub struct Fetcher {
    source: Arc<dyn ChartSource>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn ChartSource>) -> Self {
        Self { source }
    }

    /// One pull over `[now - lookback, now)`.
    ///
    /// Never returns an error: anything the upstream gets wrong is logged
    /// and converged to [`FetchOutcome::NoData`].
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        lookback: LookbackWindow,
        now: UtcDateTime,
    ) -> FetchOutcome {
        let start = now.minus_days(lookback.days());

        match self.source.download(symbol, start, now).await {
            Ok(page) => assemble_series(symbol, page),
            Err(error) => {
                warn!(symbol = %symbol, %error, "fetch failed; treating as no data");
                FetchOutcome::NoData
            }
        }
    }
}

/// Assemble validated bars from flat columns, preserving upstream row order.
///
/// Rows missing any OHLC value cannot form a complete bar and are skipped
/// (the upstream emits null placeholders for halted sessions); cells that
/// fail scalar coercion are reported on the fetch rather than defaulted.
fn assemble_series(symbol: &Symbol, page: ChartPage) -> FetchOutcome {
    let mut bars = Vec::with_capacity(page.timestamps.len());
    let mut warnings = Vec::new();

    for (index, &seconds) in page.timestamps.iter().enumerate() {
        let ts = match UtcDateTime::from_unix_timestamp(seconds) {
            Ok(ts) => ts,
            Err(error) => {
                warnings.push(format!("row {index}: {error}"));
                continue;
            }
        };

        let open = scalar_cell(&page.open, index, "open", &mut warnings);
        let high = scalar_cell(&page.high, index, "high", &mut warnings);
        let low = scalar_cell(&page.low, index, "low", &mut warnings);
        let close = scalar_cell(&page.close, index, "close", &mut warnings);

        let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) else {
            continue;
        };

        match Bar::new(ts, open, high, low, close) {
            Ok(bar) => bars.push(bar),
            Err(error) => {
                debug!(symbol = %symbol, row = index, %error, "dropping invalid bar");
            }
        }
    }

    if bars.is_empty() {
        debug!(symbol = %symbol, "upstream yielded zero usable bars");
        return FetchOutcome::NoData;
    }

    FetchOutcome::Series(SeriesFetch {
        series: PriceSeries::new(symbol.clone(), bars),
        warnings,
    })
}

fn scalar_cell(
    column: &[Option<CellValue>],
    index: usize,
    field: &'static str,
    warnings: &mut Vec<String>,
) -> Option<f64> {
    match column.get(index).cloned().flatten() {
        None => None,
        Some(cell) => match cell.into_scalar() {
            Ok(value) => Some(value),
            Err(error) => {
                warnings.push(format!("{field}[{index}]: {error}"));
                None
            }
        },
    }
}

// Chart API response structures.
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartFault>,
}

#[derive(Debug, Deserialize)]
struct ChartFault {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: FieldColumn,
    high: FieldColumn,
    low: FieldColumn,
    close: FieldColumn,
}
