//! SQLite persistence for daily price series; second source in the chain.
//!
//! Writes go through a single `Mutex<Connection>` and rows are upserted
//! with `INSERT OR REPLACE` inside a transaction, so a concurrent reader
//! never observes a torn series.

use crate::services::provider::{FetchSpan, SeriesSource, SourceOutcome};
use crate::types::{Bar, DailySeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// SQLite store for historical price data and ticker metadata.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS historical_prices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL,
                high REAL,
                low REAL,
                close REAL,
                volume INTEGER,
                adjusted_close REAL,
                UNIQUE(ticker, date)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_prices_ticker_date
             ON historical_prices(ticker, date)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tickers (
                symbol TEXT PRIMARY KEY,
                name TEXT,
                kind TEXT,
                earliest_date TEXT,
                latest_date TEXT,
                last_updated TEXT
            )",
            [],
        )?;

        Ok(())
    }

    /// Load the full ordered series for a ticker, if any rows exist.
    pub fn load_series(&self, ticker: &str) -> Result<Option<DailySeries>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT date, open, high, low, close, volume
             FROM historical_prices
             WHERE ticker = ?1
             ORDER BY date",
        )?;

        let rows = stmt.query_map(params![ticker], |row| {
            let date: String = row.get(0)?;
            let volume: i64 = row.get(5)?;
            Ok((
                date,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                volume,
            ))
        })?;

        let mut bars = Vec::new();
        for row in rows {
            let (date, open, high, low, close, volume) = row?;
            let Ok(date) = date.parse::<NaiveDate>() else {
                continue;
            };
            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume: volume.max(0) as u64,
            });
        }

        if bars.is_empty() {
            return Ok(None);
        }
        Ok(Some(DailySeries::new(ticker, bars)))
    }

    /// Upsert a series and its ticker metadata.
    pub fn save_series(&self, series: &DailySeries) -> Result<(), rusqlite::Error> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        for bar in series.bars() {
            tx.execute(
                "INSERT OR REPLACE INTO historical_prices
                 (ticker, date, open, high, low, close, volume, adjusted_close)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    series.ticker(),
                    bar.date.to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume as i64,
                    bar.close,
                ],
            )?;
        }

        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            tx.execute(
                "INSERT OR REPLACE INTO tickers
                 (symbol, name, kind, earliest_date, latest_date, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    series.ticker(),
                    series.ticker(),
                    "stock",
                    first.date.to_string(),
                    last.date.to_string(),
                    chrono::Utc::now().date_naive().to_string(),
                ],
            )?;
        }

        tx.commit()?;
        debug!("saved {} bars for {}", series.len(), series.ticker());
        Ok(())
    }

    /// All ticker symbols with stored data.
    pub fn known_tickers(&self) -> Result<Vec<String>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT symbol FROM tickers ORDER BY symbol")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect()
    }
}

#[async_trait]
impl SeriesSource for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite-store"
    }

    async fn load(&self, ticker: &str, _span: FetchSpan) -> SourceOutcome {
        match self.load_series(ticker) {
            Ok(Some(series)) => SourceOutcome::Hit(series),
            Ok(None) => SourceOutcome::Miss,
            Err(e) => SourceOutcome::Failed(e.to_string()),
        }
    }

    async fn store(&self, series: &DailySeries) {
        if let Err(e) = self.save_series(series) {
            tracing::error!("failed to persist series for {}: {}", series.ticker(), e);
        }
    }
}
