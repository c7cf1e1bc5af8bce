//! Yahoo Finance client for historical daily bars.
//!
//! Uses the unofficial chart API (no key required). Last source in the
//! series chain: a hit here is back-filled into the cache and the store.

use crate::services::provider::{FetchSpan, SeriesSource, SourceOutcome};
use crate::types::{Bar, DailySeries};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Normalize a symbol for Yahoo Finance.
/// Yahoo uses hyphens instead of dots for share classes (BRK-B, not BRK.B);
/// index symbols keep their caret prefix (^VIX).
fn normalize_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

fn range_for(span: FetchSpan) -> String {
    if span.years == 0 {
        "max".to_string()
    } else {
        format!("{}y", span.years)
    }
}

/// Convert one chart result into daily bars. Rows with a missing timestamp
/// or any missing OHLC value are skipped; Yahoo pads thinly-traded days
/// with nulls.
fn bars_from_result(result: &YahooResult) -> Vec<Bar> {
    let Some(timestamps) = &result.timestamp else {
        return Vec::new();
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    let empty_f = Vec::new();
    let empty_v = Vec::new();
    let opens = quote.open.as_ref().unwrap_or(&empty_f);
    let highs = quote.high.as_ref().unwrap_or(&empty_f);
    let lows = quote.low.as_ref().unwrap_or(&empty_f);
    let closes = quote.close.as_ref().unwrap_or(&empty_f);
    let volumes = quote.volume.as_ref().unwrap_or(&empty_v);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            opens.get(i).copied().flatten(),
            highs.get(i).copied().flatten(),
            lows.get(i).copied().flatten(),
            closes.get(i).copied().flatten(),
        ) else {
            continue;
        };
        if close <= 0.0 {
            continue;
        }
        let Some(date) = chrono::DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
        else {
            continue;
        };

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        });
    }
    bars
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the daily series for a symbol over the given span.
    ///
    /// Returns an empty vector when Yahoo has no data for the symbol (a
    /// chain miss); errors only on transport or malformed-response faults.
    pub async fn daily_series(&self, symbol: &str, span: FetchSpan) -> Result<Vec<Bar>, String> {
        let yahoo_symbol = normalize_symbol(symbol);
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d&includePrePost=false",
            yahoo_symbol,
            range_for(span),
        );

        debug!("fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(format!("API error: {}", response.status()));
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| format!("parse error: {e}"))?;

        if let Some(error) = data.chart.error {
            if error.code.eq_ignore_ascii_case("not found") {
                return Ok(Vec::new());
            }
            return Err(format!("Yahoo API error: {} - {}", error.code, error.description));
        }

        let bars = data
            .chart
            .result
            .unwrap_or_default()
            .first()
            .map(bars_from_result)
            .unwrap_or_default();

        Ok(bars)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeriesSource for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "yahoo-finance"
    }

    async fn load(&self, ticker: &str, span: FetchSpan) -> SourceOutcome {
        match self.daily_series(ticker, span).await {
            Ok(bars) if bars.is_empty() => SourceOutcome::Miss,
            Ok(bars) => SourceOutcome::Hit(DailySeries::new(ticker, bars)),
            Err(message) => SourceOutcome::Failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("aapl"), "AAPL");
        assert_eq!(normalize_symbol("BRK.B"), "BRK-B");
        assert_eq!(normalize_symbol("^vix"), "^VIX");
    }

    #[test]
    fn test_range_for_span() {
        assert_eq!(range_for(FetchSpan::years(20)), "20y");
        assert_eq!(range_for(FetchSpan::years(1)), "1y");
        assert_eq!(range_for(FetchSpan::max()), "max");
    }

    #[test]
    fn test_bars_from_result_skips_null_rows() {
        let json = r#"{
            "timestamp": [1704153600, 1704240000, 1704326400],
            "indicators": {
                "quote": [{
                    "open": [150.0, null, 152.0],
                    "high": [155.0, null, 157.0],
                    "low": [148.0, null, 150.0],
                    "close": [153.0, null, 155.0],
                    "volume": [50000000, null, 52000000]
                }]
            }
        }"#;
        let result: YahooResult = serde_json::from_str(json).unwrap();
        let bars = bars_from_result(&result);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, "2024-01-02".parse().unwrap());
        assert_eq!(bars[0].close, 153.0);
        assert_eq!(bars[1].date, "2024-01-04".parse().unwrap());
        assert_eq!(bars[1].volume, 52_000_000);
    }

    #[test]
    fn test_bars_from_result_without_timestamps() {
        let json = r#"{
            "indicators": {"quote": [{}]}
        }"#;
        let result: YahooResult = serde_json::from_str(json).unwrap();
        assert!(bars_from_result(&result).is_empty());
    }

    #[test]
    fn test_chart_error_deserialization() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let data: YahooChartResponse = serde_json::from_str(json).unwrap();
        let error = data.chart.error.unwrap();
        assert_eq!(error.code, "Not Found");
        assert!(data.chart.result.is_none());
    }

    #[test]
    fn test_client_creation() {
        let _client = YahooFinanceClient::default();
    }
}
