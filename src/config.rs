use std::collections::HashMap;
use std::env;

/// API-key authentication configuration.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Whether requests must carry a valid X-API-Key header.
    pub require_auth: bool,
    /// Accepted API keys. Empty with auth required means all requests are
    /// rejected until keys are configured.
    pub api_keys: Vec<String>,
}

/// Per-client rate limiting configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Sustained requests per minute per client.
    pub per_minute: u32,
    /// Burst size.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_minute: 10,
            burst: 20,
        }
    }
}

/// Read-only mapping from indicator symbols (volatility/sentiment indices
/// whose level is not directly tradable) to the reference ticker their
/// forward returns are conventionally read against. Injected into the query
/// service rather than consulted as global state, so tests can swap in
/// alternate mappings.
#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    references: HashMap<String, String>,
}

impl IndicatorConfig {
    pub fn new(references: HashMap<String, String>) -> Self {
        Self { references }
    }

    /// Parse `"VIX=SPY,VXN=QQQ"` pairs.
    pub fn from_pairs(pairs: &str) -> Self {
        let references = pairs
            .split(',')
            .filter_map(|pair| {
                let (indicator, reference) = pair.split_once('=')?;
                let indicator = indicator.trim();
                let reference = reference.trim();
                if indicator.is_empty() || reference.is_empty() {
                    return None;
                }
                Some((indicator.to_uppercase(), reference.to_uppercase()))
            })
            .collect();
        Self { references }
    }

    pub fn is_indicator(&self, ticker: &str) -> bool {
        self.references.contains_key(&ticker.to_uppercase())
    }

    pub fn reference_for(&self, ticker: &str) -> Option<String> {
        self.references.get(&ticker.to_uppercase()).cloned()
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        let references = [
            ("VIX", "SPY"),
            ("^VIX", "SPY"),
            ("VXN", "QQQ"),
            ("^VXN", "QQQ"),
            ("PCR", "SPY"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { references }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database path.
    pub database_path: String,
    /// Trailing history span requested from the live fetcher, in years.
    /// 0 means "max". Providers may return less; long horizons then come
    /// back null.
    pub fetch_span_years: u32,
    /// TTL for the in-memory series cache, in seconds.
    pub series_cache_ttl_secs: u64,
    /// Allow any CORS origin (development / preview deployments).
    pub cors_allow_all: bool,
    /// Allowed CORS origins when not allowing all.
    pub cors_origins: Vec<String>,
    /// Optional two-column CSV supplementing the ticker-name table.
    pub ticker_names_csv: Option<String>,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub indicators: IndicatorConfig,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_list(key: &str) -> Vec<String> {
    env::var(key)
        .ok()
        .map(|s| {
            s.split(',')
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let indicators = env::var("INDICATOR_REFERENCES")
            .ok()
            .map(|pairs| IndicatorConfig::from_pairs(&pairs))
            .unwrap_or_default();

        let cors_origins = parse_env_list("CORS_ORIGINS");

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 8000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/hindsight.db".to_string()),
            fetch_span_years: parse_env("FETCH_SPAN_YEARS", 20),
            series_cache_ttl_secs: parse_env("SERIES_CACHE_TTL_SECS", 86_400),
            cors_allow_all: parse_env("CORS_ALLOW_ALL", cors_origins.is_empty()),
            cors_origins,
            ticker_names_csv: env::var("TICKER_NAMES_CSV").ok(),
            auth: AuthConfig {
                require_auth: parse_env("REQUIRE_AUTH", false),
                api_keys: parse_env_list("API_KEYS"),
            },
            rate_limit: RateLimitConfig {
                enabled: parse_env("ENABLE_RATE_LIMIT", true),
                per_minute: parse_env("RATE_LIMIT_PER_MINUTE", 10),
                burst: parse_env("RATE_LIMIT_BURST", 20),
            },
            indicators,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_path: "data/hindsight.db".to_string(),
            fetch_span_years: 20,
            series_cache_ttl_secs: 86_400,
            cors_allow_all: true,
            cors_origins: Vec::new(),
            ticker_names_csv: None,
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            indicators: IndicatorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_indicator_mappings() {
        let indicators = IndicatorConfig::default();
        assert!(indicators.is_indicator("VIX"));
        assert!(indicators.is_indicator("vix"));
        assert_eq!(indicators.reference_for("VIX"), Some("SPY".to_string()));
        assert_eq!(indicators.reference_for("VXN"), Some("QQQ".to_string()));
        assert_eq!(indicators.reference_for("SPY"), None);
        assert!(!indicators.is_indicator("AAPL"));
    }

    #[test]
    fn test_indicator_config_from_pairs() {
        let indicators = IndicatorConfig::from_pairs("VIX=SPY, rvx=iwm,bad,=SPY,X=");
        assert_eq!(indicators.reference_for("VIX"), Some("SPY".to_string()));
        assert_eq!(indicators.reference_for("RVX"), Some("IWM".to_string()));
        assert!(!indicators.is_indicator("bad"));
        assert!(!indicators.is_indicator("X"));
    }

    #[test]
    fn test_indicator_config_injectable() {
        let indicators = IndicatorConfig::new(
            [("TEST".to_string(), "REF".to_string())].into_iter().collect(),
        );
        assert_eq!(indicators.reference_for("test"), Some("REF".to_string()));
        assert!(!indicators.is_indicator("VIX"));
    }

    #[test]
    fn test_rate_limit_defaults() {
        let rl = RateLimitConfig::default();
        assert!(rl.enabled);
        assert_eq!(rl.per_minute, 10);
        assert_eq!(rl.burst, 20);
    }

    #[test]
    fn test_auth_defaults_open() {
        let auth = AuthConfig::default();
        assert!(!auth.require_auth);
        assert!(auth.api_keys.is_empty());
    }
}
