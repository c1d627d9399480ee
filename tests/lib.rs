//! Shared fixtures for the behavioral tests: a scripted HTTP client and
//! chart-payload builders in both upstream column shapes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use tickwatch_core::{HttpClient, HttpError, HttpRequest, HttpResponse, UtcDateTime};

/// Transport double that replays a fixed response and records requests.
#[derive(Debug)]
pub struct ScriptedHttpClient {
    response: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn replying(body: impl Into<String>) -> Self {
        Self {
            response: Ok(HttpResponse::ok_json(body)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: Ok(HttpResponse {
                status,
                body: body.into(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(HttpError::new(message)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

/// Fixed reference instant so fetch windows are deterministic.
pub fn fixed_now() -> UtcDateTime {
    UtcDateTime::parse("2024-06-28T00:00:00Z").expect("reference instant")
}

fn daily_timestamps(count: usize) -> String {
    let base = 1_704_067_200_i64; // 2024-01-01T00:00:00Z
    (0..count)
        .map(|i| (base + i as i64 * 86_400).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn column(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Chart payload with flat single-level columns.
pub fn flat_chart_body(closes: &[f64]) -> String {
    let opens: Vec<f64> = closes.iter().map(|c| c - 0.25).collect();
    let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
    let lows: Vec<f64> = closes.iter().map(|c| (c - 1.0).max(0.0)).collect();

    format!(
        r#"{{"chart":{{"result":[{{"timestamp":[{}],"indicators":{{"quote":[{{"open":[{}],"high":[{}],"low":[{}],"close":[{}]}}]}}}}],"error":null}}}}"#,
        daily_timestamps(closes.len()),
        column(&opens),
        column(&highs),
        column(&lows),
        column(closes)
    )
}

/// Same data, but every column tagged a second time by symbol.
pub fn nested_chart_body(symbol: &str, closes: &[f64]) -> String {
    let opens: Vec<f64> = closes.iter().map(|c| c - 0.25).collect();
    let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
    let lows: Vec<f64> = closes.iter().map(|c| (c - 1.0).max(0.0)).collect();

    let tagged = |values: &[f64]| format!(r#"{{"{}":[{}]}}"#, symbol, column(values));

    format!(
        r#"{{"chart":{{"result":[{{"timestamp":[{}],"indicators":{{"quote":[{{"open":{},"high":{},"low":{},"close":{}}}]}}}}],"error":null}}}}"#,
        daily_timestamps(closes.len()),
        tagged(&opens),
        tagged(&highs),
        tagged(&lows),
        tagged(closes)
    )
}

/// The upstream's "symbol not found" reply.
pub fn not_found_body() -> String {
    String::from(
        r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
    )
}

/// A syntactically valid reply with zero rows.
pub fn empty_chart_body() -> String {
    String::from(
        r#"{"chart":{"result":[{"timestamp":[],"indicators":{"quote":[{"open":[],"high":[],"low":[],"close":[]}]}}],"error":null}}"#,
    )
}
