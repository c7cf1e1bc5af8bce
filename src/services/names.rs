//! Ticker name lookup, curated ticker lists, and ETF constituents.

use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Curated ticker categories exposed by the tickers endpoint. Any symbol
/// can be queried; these are the ones surfaced in the picker.
pub const MARKET_INDICES: &[&str] = &["SPY", "QQQ", "DIA"];
pub const SECTOR_ETFS: &[&str] = &["XLF", "XLE", "XLK", "XLV", "XLY", "XLP"];
pub const VOLATILITY_INDICATORS: &[&str] = &["VIX", "^VIX", "VXN", "^VXN"];
pub const SENTIMENT_INDICATORS: &[&str] = &["PCR"];
pub const COMMODITIES: &[&str] = &["GLD", "USO", "SLV"];

/// Ticker to company name mapping (well-known symbols).
const TICKER_NAMES: &[(&str, &str)] = &[
    // Technology
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("NVDA", "NVIDIA Corporation"),
    ("AVGO", "Broadcom Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("GOOG", "Alphabet Inc."),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    ("AMD", "Advanced Micro Devices"),
    ("ADBE", "Adobe Inc."),
    ("CSCO", "Cisco Systems"),
    ("NFLX", "Netflix Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("QCOM", "Qualcomm Inc."),
    ("TXN", "Texas Instruments"),
    ("INTC", "Intel Corporation"),
    ("ORCL", "Oracle Corporation"),
    ("CRM", "Salesforce Inc."),
    ("IBM", "IBM"),
    ("INTU", "Intuit Inc."),
    ("MU", "Micron Technology"),
    ("PLTR", "Palantir Technologies"),
    ("COIN", "Coinbase Global"),
    ("ASML", "ASML Holding"),
    ("TSM", "Taiwan Semiconductor"),
    // Consumer & Retail
    ("COST", "Costco Wholesale"),
    ("SBUX", "Starbucks Corporation"),
    ("MCD", "McDonald's Corporation"),
    ("NKE", "Nike Inc."),
    ("HD", "Home Depot Inc."),
    ("WMT", "Walmart Inc."),
    ("PEP", "PepsiCo Inc."),
    ("KO", "Coca-Cola Company"),
    ("PG", "Procter & Gamble"),
    ("DIS", "Walt Disney Company"),
    // Healthcare
    ("JNJ", "Johnson & Johnson"),
    ("UNH", "UnitedHealth Group"),
    ("PFE", "Pfizer Inc."),
    ("ABBV", "AbbVie Inc."),
    ("MRK", "Merck & Co."),
    ("LLY", "Eli Lilly and Company"),
    ("MRNA", "Moderna Inc."),
    // Financial Services
    ("BRK.B", "Berkshire Hathaway"),
    ("JPM", "JPMorgan Chase & Co."),
    ("BAC", "Bank of America"),
    ("WFC", "Wells Fargo"),
    ("GS", "Goldman Sachs"),
    ("MS", "Morgan Stanley"),
    ("MA", "Mastercard Incorporated"),
    ("V", "Visa Inc."),
    ("PYPL", "PayPal Holdings"),
    // Energy & Industrials
    ("XOM", "Exxon Mobil"),
    ("CVX", "Chevron Corporation"),
    ("BA", "Boeing Company"),
    ("CAT", "Caterpillar Inc."),
    ("GE", "General Electric"),
    ("F", "Ford Motor"),
    ("GM", "General Motors"),
    // ETFs & Indices
    ("SPY", "SPDR S&P 500 ETF"),
    ("QQQ", "Invesco QQQ Trust"),
    ("IWM", "iShares Russell 2000 ETF"),
    ("DIA", "SPDR Dow Jones Industrial Average ETF"),
    ("GLD", "SPDR Gold Shares"),
    ("USO", "United States Oil Fund"),
    ("SLV", "iShares Silver Trust"),
    ("TLT", "iShares 20+ Year Treasury Bond"),
    ("XLF", "Financial Select Sector SPDR"),
    ("XLE", "Energy Select Sector SPDR"),
    ("XLK", "Technology Select Sector SPDR"),
    ("XLV", "Health Care Select Sector SPDR"),
    ("XLY", "Consumer Discretionary Select Sector SPDR"),
    ("XLP", "Consumer Staples Select Sector SPDR"),
    // Volatility & Indicators
    ("VIX", "CBOE Volatility Index"),
    ("^VIX", "CBOE Volatility Index"),
    ("VXN", "Nasdaq-100 Volatility Index"),
    ("^VXN", "Nasdaq-100 Volatility Index"),
    ("PCR", "CBOE Total Put/Call Ratio"),
];

/// Sample top holdings per ETF.
const SPY_HOLDINGS: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "GOOG", "BRK.B", "LLY", "AVGO", "JPM", "XOM",
    "MA", "V", "JNJ", "UNH", "HD", "PG", "COST", "ABBV",
];
const QQQ_HOLDINGS: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "AVGO", "GOOGL", "META", "TSLA", "AMD", "ADBE", "CSCO", "NFLX", "AMZN",
    "QCOM", "TXN", "INTC", "GOOG", "COST", "SBUX", "INTU", "MU",
];
const IWM_HOLDINGS: &[&str] = &[
    "PLTR", "COIN", "SMCI", "HOOD", "RBLX", "AFRM", "UPST", "ETSY", "ROKU", "DDOG",
];

/// A suggest-endpoint match.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Suggestion {
    pub ticker: String,
    pub name: String,
}

/// Directory of ticker names and ETF constituents.
pub struct NameDirectory {
    names: HashMap<String, String>,
}

impl NameDirectory {
    pub fn new() -> Self {
        let names = TICKER_NAMES
            .iter()
            .map(|(ticker, name)| (ticker.to_string(), name.to_string()))
            .collect();
        Self { names }
    }

    /// Build the directory and supplement it with a two-column
    /// `ticker,name` CSV. CSV rows never override the built-in names.
    pub fn with_csv<P: AsRef<Path>>(path: P) -> Self {
        let mut directory = Self::new();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    let Some((ticker, name)) = line.split_once(',') else {
                        continue;
                    };
                    let ticker = ticker.trim().trim_start_matches('\u{feff}').to_string();
                    let name = name.trim().to_string();
                    if ticker.is_empty() || name.is_empty() {
                        continue;
                    }
                    directory.names.entry(ticker).or_insert(name);
                }
            }
            Err(e) => {
                warn!(
                    "could not load ticker names from {}: {}",
                    path.as_ref().display(),
                    e
                );
            }
        }
        directory
    }

    pub fn name_for(&self, ticker: &str) -> Option<&str> {
        self.names.get(&ticker.to_uppercase()).map(String::as_str)
    }

    /// Substring search over ticker symbols and company names, merging the
    /// static table with extra (e.g. store-known) tickers. Capped at 20
    /// results, sorted by symbol.
    pub fn suggest(&self, query: &str, extra_tickers: &[String]) -> Vec<Suggestion> {
        let query = query.trim().to_uppercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut tickers: Vec<String> = self
            .names
            .keys()
            .cloned()
            .chain(extra_tickers.iter().map(|t| t.to_uppercase()))
            .collect();
        tickers.sort();
        tickers.dedup();

        tickers
            .into_iter()
            .filter_map(|ticker| {
                let name = self
                    .names
                    .get(&ticker)
                    .cloned()
                    .unwrap_or_else(|| ticker.clone());
                if ticker.contains(&query) || name.to_uppercase().contains(&query) {
                    Some(Suggestion { ticker, name })
                } else {
                    None
                }
            })
            .take(20)
            .collect()
    }

    /// Sample constituents for an ETF, empty for unknown symbols.
    pub fn constituents(&self, etf: &str) -> Vec<String> {
        let holdings = match etf.to_uppercase().as_str() {
            "SPY" => SPY_HOLDINGS,
            "QQQ" => QQQ_HOLDINGS,
            "IWM" => IWM_HOLDINGS,
            _ => return Vec::new(),
        };
        holdings.iter().map(|t| t.to_string()).collect()
    }
}

impl Default for NameDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let directory = NameDirectory::new();
        assert_eq!(directory.name_for("aapl"), Some("Apple Inc."));
        assert_eq!(directory.name_for("VIX"), Some("CBOE Volatility Index"));
        assert_eq!(directory.name_for("ZZZZ"), None);
    }

    #[test]
    fn test_suggest_matches_ticker_prefix() {
        let directory = NameDirectory::new();
        let matches = directory.suggest("AAP", &[]);
        assert!(matches.iter().any(|s| s.ticker == "AAPL"));
    }

    #[test]
    fn test_suggest_matches_company_name() {
        let directory = NameDirectory::new();
        let matches = directory.suggest("volatility", &[]);
        assert!(matches.iter().any(|s| s.ticker == "VIX"));
        assert!(matches.iter().any(|s| s.ticker == "VXN"));
    }

    #[test]
    fn test_suggest_includes_extra_tickers() {
        let directory = NameDirectory::new();
        let extra = vec!["ZXZX".to_string()];
        let matches = directory.suggest("zxz", &extra);
        assert_eq!(
            matches,
            vec![Suggestion {
                ticker: "ZXZX".to_string(),
                name: "ZXZX".to_string(),
            }]
        );
    }

    #[test]
    fn test_suggest_caps_results() {
        let directory = NameDirectory::new();
        // Single-letter query matches many symbols.
        assert!(directory.suggest("A", &[]).len() <= 20);
    }

    #[test]
    fn test_suggest_empty_query() {
        let directory = NameDirectory::new();
        assert!(directory.suggest("  ", &[]).is_empty());
    }

    #[test]
    fn test_constituents() {
        let directory = NameDirectory::new();
        assert!(directory.constituents("spy").contains(&"AAPL".to_string()));
        assert!(!directory.constituents("QQQ").is_empty());
        assert!(directory.constituents("GLD").is_empty());
    }

    #[test]
    fn test_with_csv_supplements_without_override() {
        let dir = std::env::temp_dir().join("hindsight-names-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("names.csv");
        std::fs::write(&path, "ZXZX,Example Corp\nAAPL,Wrong Name\nbad line\n").unwrap();

        let directory = NameDirectory::with_csv(&path);
        assert_eq!(directory.name_for("ZXZX"), Some("Example Corp"));
        // Built-in name wins.
        assert_eq!(directory.name_for("AAPL"), Some("Apple Inc."));
    }

    #[test]
    fn test_with_csv_missing_file_falls_back() {
        let directory = NameDirectory::with_csv("/nonexistent/names.csv");
        assert_eq!(directory.name_for("AAPL"), Some("Apple Inc."));
    }
}
