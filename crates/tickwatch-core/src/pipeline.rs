//! Per-request orchestration: normalize, fetch, derive the trend reading.
//!
//! There is no process-wide input state; every invocation carries its own
//! [`ViewRequest`] and produces a self-contained [`ViewSnapshot`] for the
//! presentation layer to render.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::fetcher::{ChartSource, FetchOutcome, Fetcher, YahooChartSource};
use crate::generation::{Generation, GenerationCounter};
use crate::http::HttpClient;
use crate::signal::{compute_signal, SignalError, TrendReport, DEFAULT_SIGNAL_WINDOW};
use crate::{LookbackWindow, PriceSeries, Symbol, SymbolNormalizer, UtcDateTime, ValidationError};

/// Pipeline configuration, validated once at startup. An invalid
/// configuration is a fatal programmer error, not a per-request condition.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub default_symbol: Symbol,
    pub sma_window: usize,
    pub timeout: Duration,
}

impl ViewerConfig {
    pub fn new(
        default_symbol: Symbol,
        sma_window: usize,
        timeout: Duration,
    ) -> Result<Self, ValidationError> {
        if sma_window == 0 {
            return Err(ValidationError::ZeroSignalWindow);
        }
        Ok(Self {
            default_symbol,
            sma_window,
            timeout,
        })
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_symbol: Symbol::parse("2330.TW").expect("default symbol is valid"),
            sma_window: DEFAULT_SIGNAL_WINDOW,
            timeout: Duration::from_secs(10),
        }
    }
}

/// One user interaction's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub raw_ticker: String,
    pub lookback_days: u32,
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewSnapshot {
    /// Series fetched and the reading is defined.
    View {
        symbol: Symbol,
        series: PriceSeries,
        report: TrendReport,
        /// Recovered numeric-coercion reports; non-fatal, distinct from
        /// no-data.
        warnings: Vec<String>,
    },
    /// Series fetched but shorter than the moving-average window.
    InsufficientData {
        symbol: Symbol,
        series: PriceSeries,
        have: usize,
        window: usize,
    },
    /// The upstream yielded zero usable bars.
    NoData { symbol: Symbol, message: String },
}

/// The viewer pipeline: normalizer, fetcher, and signal engine run
/// sequentially per invocation.
pub struct Pipeline {
    normalizer: SymbolNormalizer,
    fetcher: Fetcher,
    window: usize,
    generations: GenerationCounter,
}

impl Pipeline {
    /// Production wiring over the chart API.
    pub fn new(config: ViewerConfig, http: Arc<dyn HttpClient>) -> Self {
        let timeout = config.timeout;
        Self::with_source(config, Arc::new(YahooChartSource::new(http, timeout)))
    }

    /// Wire an arbitrary source; tests script this seam.
    pub fn with_source(config: ViewerConfig, source: Arc<dyn ChartSource>) -> Self {
        Self {
            normalizer: SymbolNormalizer::new(config.default_symbol),
            fetcher: Fetcher::new(source),
            window: config.sma_window,
            generations: GenerationCounter::new(),
        }
    }

    pub fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    /// Run the pipeline once at the current wall-clock time.
    pub async fn run(&self, request: &ViewRequest) -> ViewSnapshot {
        self.run_at(request, UtcDateTime::now()).await
    }

    /// Like [`Pipeline::run`], stamped for stale-result discard: apply the
    /// snapshot only while `generations().is_current(generation)` holds.
    pub async fn run_stamped(&self, request: &ViewRequest) -> (Generation, ViewSnapshot) {
        let generation = self.generations.next();
        let snapshot = self.run(request).await;
        (generation, snapshot)
    }

    /// Run with an explicit `now`, for deterministic tests.
    pub async fn run_at(&self, request: &ViewRequest, now: UtcDateTime) -> ViewSnapshot {
        let symbol = self.normalizer.normalize(&request.raw_ticker);
        debug!(symbol = %symbol, days = request.lookback_days, "pipeline run");

        let lookback = match LookbackWindow::new(request.lookback_days) {
            Ok(lookback) => lookback,
            Err(_) => return Self::no_data(symbol),
        };

        match self.fetcher.fetch(&symbol, lookback, now).await {
            FetchOutcome::NoData => Self::no_data(symbol),
            FetchOutcome::Series(fetch) => match compute_signal(&fetch.series, self.window) {
                Ok(report) => ViewSnapshot::View {
                    symbol,
                    series: fetch.series,
                    report,
                    warnings: fetch.warnings,
                },
                Err(SignalError::InsufficientData { have, window }) => {
                    ViewSnapshot::InsufficientData {
                        symbol,
                        series: fetch.series,
                        have,
                        window,
                    }
                }
            },
        }
    }

    fn no_data(symbol: Symbol) -> ViewSnapshot {
        let message = format!(
            "No data found for {symbol}. Check the ticker format \
             (e.g. 2330.TW for Taiwan listings, AAPL for US stocks)."
        );
        ViewSnapshot::NoData { symbol, message }
    }
}
