use std::env;
use std::time::Duration;

/// Default watchlist for the trending disasters board
pub const DEFAULT_TRENDING_SYMBOLS: &[&str] =
    &["AAPL", "NFLX", "TSLA", "META", "GME", "MSFT", "GOOGL"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Unknown provider type: {name} (expected one of: {})", .available.join(", "))]
    UnknownProvider {
        name: String,
        available: Vec<&'static str>,
    },
}

/// Runtime configuration collected from the environment.
///
/// Missing credentials are not an error here: each provider treats an
/// absent key as "not configured" and answers without touching the network.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub finnhub_api_key: Option<String>,
    pub finnhub_base_url: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ai_model: String,
    /// Which service answers quote lookups (`finnhub` or `alpha_vantage`)
    pub quote_provider: String,
    /// Which service answers raw symbol searches
    pub search_provider: String,
    pub news_lookback_days: u64,
    pub http_timeout: Duration,
    pub trending_symbols: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            finnhub_api_key: None,
            finnhub_base_url: None,
            alpha_vantage_api_key: None,
            openai_api_key: None,
            ai_model: "gpt-4o-mini".to_string(),
            quote_provider: "finnhub".to_string(),
            search_provider: "alpha_vantage".to_string(),
            news_lookback_days: 4,
            http_timeout: Duration::from_secs(30),
            trending_symbols: DEFAULT_TRENDING_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        let news_lookback_days = match get("NEWS_LOOKBACK_DAYS") {
            Some(value) => parse_number::<u64>("NEWS_LOOKBACK_DAYS", &value)?,
            None => defaults.news_lookback_days,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number::<u64>("HTTP_TIMEOUT_SECS", &value)?),
            None => defaults.http_timeout,
        };

        let trending_symbols = match get("TRENDING_SYMBOLS") {
            Some(value) => parse_symbol_list(&value),
            None => defaults.trending_symbols,
        };

        Ok(Self {
            finnhub_api_key: get("FINNHUB_API_KEY"),
            finnhub_base_url: get("FINNHUB_BASE_URL"),
            alpha_vantage_api_key: get("ALPHA_VANTAGE_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            ai_model: get("AI_MODEL").unwrap_or(defaults.ai_model),
            quote_provider: get("QUOTE_PROVIDER")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.quote_provider),
            search_provider: get("SEARCH_PROVIDER")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.search_provider),
            news_lookback_days,
            http_timeout,
            trending_symbols,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Split a comma separated symbol list, uppercasing and dropping blanks
pub fn parse_symbol_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
