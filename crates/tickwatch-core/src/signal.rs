//! Trend signal engine.
//!
//! Pure computation: a trailing simple moving average over the close column
//! and a three-state cue from comparing the latest close against the latest
//! average. No I/O, no mutation of the input series; the overlay comes back
//! as an index-aligned column of its own.

use serde::Serialize;
use thiserror::Error;

use crate::PriceSeries;

/// Default moving-average window, in bars.
pub const DEFAULT_SIGNAL_WINDOW: usize = 20;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    #[error("series has {have} bars, need at least {window} for a defined moving average")]
    InsufficientData { have: usize, window: usize },
}

/// Three-state decision cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendSignal {
    /// Strict total order on close vs average; exact equality is the only
    /// tie.
    fn classify(latest_close: f64, latest_average: f64) -> Self {
        if latest_close > latest_average {
            Self::Bullish
        } else if latest_close < latest_average {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub const fn cue(self) -> &'static str {
        match self {
            Self::Bullish => "bullish: price above the moving average",
            Self::Bearish => "bearish: price below the moving average",
            Self::Neutral => "neutral: price sitting on the moving average",
        }
    }
}

/// Latest close, latest average, and the cue derived from them. Computed
/// fresh on every request, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendReading {
    pub latest_close: f64,
    pub latest_average: f64,
    pub signal: TrendSignal,
}

/// Moving-average overlay plus the latest reading.
///
/// `moving_average` is index-aligned with the input series' bars; positions
/// without enough history are `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub moving_average: Vec<Option<f64>>,
    pub reading: TrendReading,
}

/// Trailing simple moving average.
///
/// The value at position `i` is the mean of `values[i + 1 - window ..= i]`;
/// positions with fewer than `window` observations are undefined.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for (offset, chunk) in values.windows(window).enumerate() {
        out[offset + window - 1] = Some(chunk.iter().sum::<f64>() / window as f64);
    }
    out
}

/// Derive the moving-average overlay and the latest trend reading.
///
/// A series shorter than the window is a distinct [`SignalError`] outcome;
/// it is never collapsed into a fabricated Neutral reading.
pub fn compute_signal(series: &PriceSeries, window: usize) -> Result<TrendReport, SignalError> {
    let closes = series.closes();
    let overlay = moving_average(&closes, window);

    match (closes.last().copied(), overlay.last().copied().flatten()) {
        (Some(latest_close), Some(latest_average)) => Ok(TrendReport {
            reading: TrendReading {
                latest_close,
                latest_average,
                signal: TrendSignal::classify(latest_close, latest_average),
            },
            moving_average: overlay,
        }),
        _ => Err(SignalError::InsufficientData {
            have: series.len(),
            window,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bar, Symbol, UtcDateTime};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let base = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("timestamp");
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let ts = UtcDateTime::from_unix_timestamp(base.unix_timestamp() + i as i64 * 86_400)
                    .expect("in range");
                Bar::new(ts, close, close + 1.0, (close - 1.0).max(0.0), close).expect("bar")
            })
            .collect();
        PriceSeries::new(Symbol::parse("TEST").expect("symbol"), bars)
    }

    #[test]
    fn positions_before_the_window_are_undefined() {
        let avg = moving_average(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(avg, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn exact_window_yields_one_defined_value() {
        let avg = moving_average(&[2.0, 4.0, 6.0], 3);
        assert_eq!(avg, vec![None, None, Some(4.0)]);
    }

    #[test]
    fn window_minus_one_yields_none_at_all() {
        let avg = moving_average(&[2.0, 4.0], 3);
        assert_eq!(avg, vec![None, None]);
    }

    #[test]
    fn final_spike_above_the_average_reads_bullish() {
        let mut closes = vec![10.0; 20];
        closes.push(12.0);
        let report = compute_signal(&series_from_closes(&closes), 20).expect("enough bars");

        assert_eq!(report.reading.latest_close, 12.0);
        assert!((report.reading.latest_average - 10.1).abs() < 1e-9);
        assert_eq!(report.reading.signal, TrendSignal::Bullish);
    }

    #[test]
    fn flat_series_reads_neutral() {
        let closes = vec![20.0; 21];
        let report = compute_signal(&series_from_closes(&closes), 20).expect("enough bars");

        assert_eq!(report.reading.latest_average, 20.0);
        assert_eq!(report.reading.signal, TrendSignal::Neutral);
    }

    #[test]
    fn close_below_the_average_reads_bearish() {
        let mut closes = vec![10.0; 20];
        closes.push(8.0);
        let report = compute_signal(&series_from_closes(&closes), 20).expect("enough bars");
        assert_eq!(report.reading.signal, TrendSignal::Bearish);
    }

    #[test]
    fn short_series_surfaces_insufficient_data() {
        let err = compute_signal(&series_from_closes(&[10.0; 19]), 20).expect_err("must fail");
        assert_eq!(
            err,
            SignalError::InsufficientData {
                have: 19,
                window: 20
            }
        );
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let series = series_from_closes(&[9.5, 10.0, 10.5, 11.0, 10.75, 10.9, 11.2]);
        let first = compute_signal(&series, 5).expect("enough bars");
        let second = compute_signal(&series, 5).expect("enough bars");
        assert_eq!(first, second);
    }

    #[test]
    fn overlay_is_aligned_with_the_series() {
        let series = series_from_closes(&[10.0; 25]);
        let report = compute_signal(&series, 20).expect("enough bars");
        assert_eq!(report.moving_average.len(), series.len());
        assert!(report.moving_average[18].is_none());
        assert_eq!(report.moving_average[19], Some(10.0));
    }
}
