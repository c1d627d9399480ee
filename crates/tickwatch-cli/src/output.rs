//! Render a pipeline snapshot. Formatting only; all data transformation
//! happened in the core.

use tickwatch_core::{PriceSeries, TrendReport, ViewSnapshot};

use crate::cli::OutputFormat;
use crate::error::CliError;

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 12;
const TABLE_TAIL: usize = 10;

pub fn render(snapshot: &ViewSnapshot, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(snapshot)?
            } else {
                serde_json::to_string(snapshot)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(snapshot),
    }

    Ok(())
}

fn render_table(snapshot: &ViewSnapshot) {
    match snapshot {
        ViewSnapshot::NoData { message, .. } => {
            println!("{message}");
        }
        ViewSnapshot::InsufficientData {
            symbol,
            series,
            have,
            window,
        } => {
            println!("{symbol}: {have} bars fetched, {window} needed for a moving average.");
            if let Some(latest) = series.latest() {
                println!("latest close: {:.2} ({})", latest.close, date_of(latest.ts));
            }
            println!("Widen the lookback window to get a trend reading.");
        }
        ViewSnapshot::View {
            symbol,
            series,
            report,
            warnings,
        } => {
            for warning in warnings {
                eprintln!("warning: {warning}");
            }

            let first = series.bars.first().map(|bar| date_of(bar.ts));
            let last = series.bars.last().map(|bar| date_of(bar.ts));
            println!(
                "{symbol}  {} bars  {} .. {}",
                series.len(),
                first.unwrap_or_default(),
                last.unwrap_or_default()
            );
            println!(
                "close {:.2}  avg {:.2}  {}",
                report.reading.latest_close,
                report.reading.latest_average,
                report.reading.signal.cue()
            );
            println!();

            for line in chart_lines(series, report) {
                println!("{line}");
            }
            println!();

            render_recent_bars(series, report);
        }
    }
}

/// Close prices as `*`, moving average as `+`, sampled down to the chart
/// width.
fn chart_lines(series: &PriceSeries, report: &TrendReport) -> Vec<String> {
    let closes = series.closes();
    if closes.is_empty() {
        return Vec::new();
    }

    let width = closes.len().min(CHART_WIDTH);
    let sample = |column: usize| -> usize {
        if width == 1 {
            0
        } else {
            column * (closes.len() - 1) / (width - 1)
        }
    };

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &close in &closes {
        lo = lo.min(close);
        hi = hi.max(close);
    }
    for value in report.moving_average.iter().flatten() {
        lo = lo.min(*value);
        hi = hi.max(*value);
    }
    if hi - lo < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let row_of = |value: f64| -> usize {
        let scaled = (value - lo) / (hi - lo) * (CHART_HEIGHT - 1) as f64;
        (CHART_HEIGHT - 1).saturating_sub(scaled.round() as usize)
    };

    let mut grid = vec![vec![' '; width]; CHART_HEIGHT];
    for column in 0..width {
        let index = sample(column);
        if let Some(Some(average)) = report.moving_average.get(index) {
            grid[row_of(*average)][column] = '+';
        }
        grid[row_of(closes[index])][column] = '*';
    }

    grid.into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let line: String = cells.into_iter().collect();
            let label = if row == 0 {
                format!("{hi:>10.2}")
            } else if row == CHART_HEIGHT - 1 {
                format!("{lo:>10.2}")
            } else {
                " ".repeat(10)
            };
            format!("{label} |{line}")
        })
        .collect()
}

fn render_recent_bars(series: &PriceSeries, report: &TrendReport) {
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "date", "open", "high", "low", "close", "avg"
    );

    let skip = series.len().saturating_sub(TABLE_TAIL);
    for (bar, average) in series
        .bars
        .iter()
        .zip(report.moving_average.iter())
        .skip(skip)
    {
        let average = average
            .map(|value| format!("{value:>10.2}"))
            .unwrap_or_else(|| format!("{:>10}", "-"));
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {average}",
            date_of(bar.ts),
            bar.open,
            bar.high,
            bar.low,
            bar.close
        );
    }
}

fn date_of(ts: tickwatch_core::UtcDateTime) -> String {
    let formatted = ts.format_rfc3339();
    formatted.chars().take(10).collect()
}
