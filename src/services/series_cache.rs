//! In-memory TTL cache of whole daily series; first source in the chain.

use crate::services::provider::{FetchSpan, SeriesSource, SourceOutcome};
use crate::types::DailySeries;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

struct CacheEntry {
    series: DailySeries,
    expires_at: Instant,
}

/// Thread-safe series cache with TTL expiry.
pub struct SeriesCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, ticker: &str) -> Option<DailySeries> {
        let entry = self.entries.get(ticker)?;
        if entry.expires_at > Instant::now() {
            Some(entry.series.clone())
        } else {
            drop(entry);
            self.entries.remove(ticker);
            None
        }
    }

    pub fn set(&self, series: DailySeries) {
        self.entries.insert(
            series.ticker().to_string(),
            CacheEntry {
                series,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn remove(&self, ticker: &str) -> bool {
        self.entries.remove(ticker).is_some()
    }

    /// Drop all expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SeriesSource for SeriesCache {
    fn name(&self) -> &'static str {
        "memory-cache"
    }

    async fn load(&self, ticker: &str, _span: FetchSpan) -> SourceOutcome {
        match self.get(ticker) {
            Some(series) => SourceOutcome::Hit(series),
            None => SourceOutcome::Miss,
        }
    }

    async fn store(&self, series: &DailySeries) {
        self.set(series.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;

    fn sample_series(ticker: &str) -> DailySeries {
        DailySeries::new(
            ticker,
            vec![Bar {
                date: "2024-01-02".parse().unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 10_000,
            }],
        )
    }

    #[test]
    fn test_set_and_get() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.set(sample_series("SPY"));

        assert_eq!(cache.get("SPY"), Some(sample_series("SPY")));
        assert_eq!(cache.get("QQQ"), None);
    }

    #[test]
    fn test_expiration() {
        let cache = SeriesCache::new(Duration::from_millis(10));
        cache.set(sample_series("SPY"));
        assert!(cache.get("SPY").is_some());

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("SPY"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cleanup_retains_live_entries() {
        let cache = SeriesCache::new(Duration::from_millis(10));
        cache.set(sample_series("SPY"));
        std::thread::sleep(Duration::from_millis(20));

        // Insert a fresh entry after the first expired.
        let fresh = SeriesCache::new(Duration::from_secs(60));
        fresh.set(sample_series("QQQ"));

        cache.cleanup();
        assert_eq!(cache.len(), 0);
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_remove() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        cache.set(sample_series("SPY"));
        assert!(cache.remove("SPY"));
        assert!(!cache.remove("SPY"));
    }

    #[tokio::test]
    async fn test_source_miss_then_hit_after_store() {
        let cache = SeriesCache::new(Duration::from_secs(60));
        let span = FetchSpan::years(20);

        assert!(matches!(
            cache.load("SPY", span).await,
            SourceOutcome::Miss
        ));

        cache.store(&sample_series("SPY")).await;
        assert!(matches!(
            cache.load("SPY", span).await,
            SourceOutcome::Hit(_)
        ));
    }
}
