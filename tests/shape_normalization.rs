//! Upstream shape instability: nested column tagging and zero-row replies
//! must normalize to the same clean series a flat reply produces.

use std::sync::Arc;
use std::time::Duration;

use tickwatch_core::{
    FetchOutcome, Fetcher, LookbackWindow, Symbol, YahooChartSource,
};
use tickwatch_tests::{
    empty_chart_body, fixed_now, flat_chart_body, nested_chart_body, ScriptedHttpClient,
};

fn fetcher_replying(body: String) -> Fetcher {
    let source = YahooChartSource::new(
        Arc::new(ScriptedHttpClient::replying(body)),
        Duration::from_secs(5),
    );
    Fetcher::new(Arc::new(source))
}

#[tokio::test]
async fn nested_and_flat_payloads_yield_identical_series() {
    let closes = [101.5, 102.25, 100.75, 103.0, 104.5];
    let symbol = Symbol::parse("2330.TW").expect("symbol");
    let lookback = LookbackWindow::new(90).expect("lookback");

    let flat = fetcher_replying(flat_chart_body(&closes))
        .fetch(&symbol, lookback, fixed_now())
        .await;
    let nested = fetcher_replying(nested_chart_body("2330.TW", &closes))
        .fetch(&symbol, lookback, fixed_now())
        .await;

    assert_eq!(flat, nested);

    let FetchOutcome::Series(fetch) = flat else {
        panic!("expected a series");
    };
    assert_eq!(fetch.series.len(), closes.len());
    assert_eq!(fetch.series.closes(), closes);
    assert!(fetch.warnings.is_empty());
}

#[tokio::test]
async fn series_preserves_upstream_ascending_order() {
    let closes = [10.0, 11.0, 9.5, 12.0];
    let symbol = Symbol::parse("AAPL").expect("symbol");
    let lookback = LookbackWindow::new(30).expect("lookback");

    let outcome = fetcher_replying(flat_chart_body(&closes))
        .fetch(&symbol, lookback, fixed_now())
        .await;

    let FetchOutcome::Series(fetch) = outcome else {
        panic!("expected a series");
    };
    let stamps: Vec<i64> = fetch
        .series
        .bars
        .iter()
        .map(|bar| bar.ts.unix_timestamp())
        .collect();
    let mut sorted = stamps.clone();
    sorted.sort_unstable();
    assert_eq!(stamps, sorted);
}

#[tokio::test]
async fn zero_row_reply_is_no_data_not_an_error() {
    let symbol = Symbol::parse("AAPL").expect("symbol");
    let lookback = LookbackWindow::new(30).expect("lookback");

    let outcome = fetcher_replying(empty_chart_body())
        .fetch(&symbol, lookback, fixed_now())
        .await;
    assert_eq!(outcome, FetchOutcome::NoData);
}

#[tokio::test]
async fn unparseable_body_converges_to_no_data() {
    let symbol = Symbol::parse("AAPL").expect("symbol");
    let lookback = LookbackWindow::new(30).expect("lookback");

    let outcome = fetcher_replying(String::from("<html>rate limited</html>"))
        .fetch(&symbol, lookback, fixed_now())
        .await;
    assert_eq!(outcome, FetchOutcome::NoData);
}

#[tokio::test]
async fn fetch_window_is_derived_from_now_and_lookback() {
    let client = Arc::new(ScriptedHttpClient::replying(flat_chart_body(&[10.0; 5])));
    let source = YahooChartSource::new(Arc::clone(&client) as _, Duration::from_secs(5));
    let fetcher = Fetcher::new(Arc::new(source));

    let symbol = Symbol::parse("AAPL").expect("symbol");
    let lookback = LookbackWindow::new(180).expect("lookback");
    let now = fixed_now();
    let _ = fetcher.fetch(&symbol, lookback, now).await;

    let requests = client.recorded_requests();
    assert_eq!(requests.len(), 1);
    let url = &requests[0].url;
    let start = now.minus_days(180).unix_timestamp();
    assert!(url.contains(&format!("period1={start}")));
    assert!(url.contains(&format!("period2={}", now.unix_timestamp())));
    assert!(url.contains("interval=1d"));
}
