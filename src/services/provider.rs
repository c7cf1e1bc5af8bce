//! Series acquisition as an explicit ordered chain of named sources.
//!
//! Each source reports a hit, a miss, or a failure; the provider tries them
//! in order, surfaces the first hit, and aggregates failure messages when
//! every source comes up empty. On a hit, earlier sources are back-filled
//! so the next query for the same ticker stops sooner in the chain.

use crate::error::{AppError, Result};
use crate::types::DailySeries;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Trailing history span requested from sources, in years. Zero means the
/// maximum the source will serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSpan {
    pub years: u32,
}

impl FetchSpan {
    pub fn years(years: u32) -> Self {
        Self { years }
    }

    pub fn max() -> Self {
        Self { years: 0 }
    }
}

/// Outcome of asking one source for a series.
#[derive(Debug, Clone)]
pub enum SourceOutcome {
    Hit(DailySeries),
    Miss,
    Failed(String),
}

/// One named source in the fallback chain.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self, ticker: &str, span: FetchSpan) -> SourceOutcome;

    /// Back-fill hook, invoked when a later source in the chain produced
    /// the series. Default is a no-op for sources that cannot store.
    async fn store(&self, _series: &DailySeries) {}
}

/// Ordered fallback chain over series sources.
pub struct SeriesProvider {
    sources: Vec<Arc<dyn SeriesSource>>,
}

impl SeriesProvider {
    pub fn new(sources: Vec<Arc<dyn SeriesSource>>) -> Self {
        Self { sources }
    }

    /// Fetch the series for `ticker`, trying each source in order.
    ///
    /// Ticker symbols are normalized to trimmed uppercase before reaching
    /// any source, so cache keys and store rows stay canonical.
    pub async fn get_series(&self, ticker: &str, span: FetchSpan) -> Result<DailySeries> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AppError::InvalidQuery("ticker must not be empty".to_string()));
        }

        let mut failures: Vec<String> = Vec::new();

        for (index, source) in self.sources.iter().enumerate() {
            match source.load(&ticker, span).await {
                SourceOutcome::Hit(series) if series.is_empty() => {
                    warn!("{} returned an empty series for {}", source.name(), ticker);
                    failures.push(format!("{}: empty series", source.name()));
                }
                SourceOutcome::Hit(series) => {
                    debug!(
                        "{} hit for {} ({} bars)",
                        source.name(),
                        ticker,
                        series.len()
                    );
                    for earlier in &self.sources[..index] {
                        earlier.store(&series).await;
                    }
                    if index > 0 {
                        info!("back-filled {} into {} earlier source(s)", ticker, index);
                    }
                    return Ok(series);
                }
                SourceOutcome::Miss => {
                    debug!("{} miss for {}", source.name(), ticker);
                }
                SourceOutcome::Failed(message) => {
                    warn!("{} failed for {}: {}", source.name(), ticker, message);
                    failures.push(format!("{}: {}", source.name(), message));
                }
            }
        }

        let detail = if failures.is_empty() {
            "no source had data".to_string()
        } else {
            failures.join("; ")
        };
        Err(AppError::TickerUnavailable(format!("{ticker} ({detail})")))
    }
}
