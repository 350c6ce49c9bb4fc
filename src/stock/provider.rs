use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alpha_vantage::AlphaVantageProvider;
use super::finnhub::FinnhubProvider;
use crate::config::{AppConfig, ConfigError};

/// Every outcome a provider call can declare besides success.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Credential missing, no request was made
    #[error("{0} is not configured")]
    ConfigAbsent(String),
    /// Upstream has no data for the symbol
    #[error("Symbol not found: {0}")]
    NotFound(String),
    /// Network request failed or returned an error status
    #[error("Network error: {0}")]
    Transport(String),
    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convert AlphaVantageError to ProviderError
impl From<alpha_vantage::error::Error> for ProviderError {
    fn from(error: alpha_vantage::error::Error) -> Self {
        let error_msg = format!("{:?}", error);

        if error_msg.contains("Invalid API call")
            || error_msg.contains("NotFound")
            || error_msg.contains("InvalidData")
        {
            ProviderError::NotFound(error_msg)
        } else if error_msg.contains("Json") || error_msg.contains("Decode") {
            ProviderError::Parse(error_msg)
        } else {
            ProviderError::Transport(error_msg)
        }
    }
}

/// Point-in-time price snapshot in the one shape the rest of the crate sees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Stock symbol (e.g., "AAPL")
    pub symbol: String,
    /// Current price
    pub price: f64,
    /// Absolute change from previous close
    pub change: f64,
    /// Percentage change from previous close
    pub change_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: f64, change: f64, change_percent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change,
            change_percent,
            company_name: None,
            open: None,
            high: None,
            low: None,
            previous_close: None,
        }
    }
}

/// Upstream convention: a zero price together with a zero previous close
/// means "unknown symbol", not "worthless".
pub fn is_sentinel_zero(price: f64, previous_close: f64) -> bool {
    price == 0.0 && previous_close == 0.0
}

/// Stock news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub headline: String,
    pub summary: String,
    /// Publisher name
    pub source: String,
    /// URL to the full article
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsItem {
    pub fn new(headline: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            summary: summary.into(),
            source: String::new(),
            url: String::new(),
            published_at: None,
        }
    }
}

/// A raw text match from a symbol search service, before quote resolution
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub symbol: String,
    pub name: Option<String>,
}

/// A search result that is known to be quotable right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Source of current quotes
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Fetch current quote for a single stock
    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError>;
}

/// Source of recent company news
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch recent news for a stock, at most [`MAX_NEWS_ITEMS`] items
    async fn get_news(&self, symbol: &str) -> Result<Vec<NewsItem>, ProviderError>;
}

/// Free-text symbol lookup
#[async_trait]
pub trait SymbolSource: Send + Sync {
    fn name(&self) -> &str;

    async fn find_symbols(&self, query: &str) -> Result<Vec<RawMatch>, ProviderError>;
}

/// Upper bound on news items handed to the rest of the pipeline
pub const MAX_NEWS_ITEMS: usize = 5;

/// The three provider roles the service needs, resolved from configuration
pub struct ProviderSet {
    pub quotes: Arc<dyn QuoteProvider>,
    pub symbols: Arc<dyn SymbolSource>,
    pub news: Arc<dyn NewsProvider>,
}

/// Factory for creating stock data providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Resolve every role from configuration.
    ///
    /// One instance per upstream is built and shared between roles, so
    /// Finnhub serving quotes, news and search reuses a single HTTP client.
    pub fn from_config(config: &AppConfig) -> Result<ProviderSet, ConfigError> {
        let finnhub = Arc::new(FinnhubProvider::from_config(config));
        let alpha_vantage = Arc::new(AlphaVantageProvider::from_config(config));

        let quotes: Arc<dyn QuoteProvider> = match config.quote_provider.as_str() {
            "finnhub" => finnhub.clone(),
            "alpha_vantage" | "alphavantage" => alpha_vantage.clone(),
            other => return Err(Self::unknown(other)),
        };

        let symbols: Arc<dyn SymbolSource> = match config.search_provider.as_str() {
            "finnhub" => finnhub.clone(),
            "alpha_vantage" | "alphavantage" => alpha_vantage,
            other => return Err(Self::unknown(other)),
        };

        // News only comes from Finnhub
        Ok(ProviderSet {
            quotes,
            symbols,
            news: finnhub,
        })
    }

    /// List available providers
    pub fn available_providers() -> Vec<&'static str> {
        vec!["finnhub", "alpha_vantage"]
    }

    fn unknown(name: &str) -> ConfigError {
        ConfigError::UnknownProvider {
            name: name.to_string(),
            available: Self::available_providers(),
        }
    }
}
