//! # Tickwatch Core
//!
//! Ingestion and trend-signal pipeline for a single-ticker market viewer.
//!
//! Given a free-text ticker input and a lookback window, the pipeline
//! retrieves historical daily bars from the upstream chart API, normalizes
//! them into a shape-stable [`PriceSeries`], and derives a trailing
//! moving-average [`TrendReading`] with a three-state decision cue.
//!
//! The crate is a pure computation library: it exposes no network or file
//! interface of its own beyond the [`HttpClient`] seam the presentation
//! layer injects. Everything the upstream source can get wrong — unknown
//! symbols, empty result sets, nested column tagging, wrapped or bundled
//! numeric cells — is absorbed during ingestion, so downstream consumers
//! only ever see a complete series or a single `NoData` outcome.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Domain types (Symbol, Bar, PriceSeries, UtcDateTime) |
//! | [`table`] | One-shot wire-shape normalization (flatten, scalar unwrap) |
//! | [`http`] | Transport seam (reqwest-backed, mockable) |
//! | [`fetcher`] | Market data fetcher converging all failures to NoData |
//! | [`signal`] | Trend signal engine (trailing SMA, Bullish/Bearish/Neutral) |
//! | [`pipeline`] | Per-request orchestration and snapshot types |
//! | [`generation`] | Stale-result discard for overlapping invocations |

pub mod domain;
pub mod error;
pub mod fetcher;
pub mod generation;
pub mod http;
pub mod pipeline;
pub mod signal;
pub mod table;

pub use domain::{Bar, LookbackWindow, PriceSeries, Symbol, SymbolNormalizer, UtcDateTime};
pub use error::ValidationError;
pub use fetcher::{ChartPage, ChartSource, FetchError, FetchOutcome, Fetcher, SeriesFetch, YahooChartSource};
pub use generation::{Generation, GenerationCounter};
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use pipeline::{Pipeline, ViewRequest, ViewSnapshot, ViewerConfig};
pub use signal::{
    compute_signal, moving_average, SignalError, TrendReading, TrendReport, TrendSignal,
    DEFAULT_SIGNAL_WINDOW,
};
pub use table::{CellValue, FieldColumn, ShapeError};
