//! Finnhub adapter: quotes via `/quote`, company news via `/company-news`
//! and symbol lookup via `/search`.
//!
//! Finnhub answers unknown symbols with an all-zero quote rather than an
//! error status, so the sentinel check lives here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::provider::{
    is_sentinel_zero, NewsItem, NewsProvider, ProviderError, Quote, QuoteProvider, RawMatch,
    SymbolSource, MAX_NEWS_ITEMS,
};
use crate::config::AppConfig;

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_NAME: &str = "Finnhub";

/// Response from /quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
}

/// One element of the /company-news array
#[derive(Debug, Deserialize)]
struct NewsResponseItem {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
    /// Unix seconds
    datetime: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    description: String,
    symbol: String,
}

/// Finnhub data provider.
///
/// Holds an optional key; without one every call answers
/// [`ProviderError::ConfigAbsent`] and no request leaves the process.
pub struct FinnhubProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    news_lookback_days: u64,
}

impl FinnhubProvider {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: BASE_URL.to_string(),
            news_lookback_days: 4,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut provider = Self::new(config.finnhub_api_key.clone(), config.http_timeout)
            .with_news_lookback_days(config.news_lookback_days);
        if let Some(base_url) = &config.finnhub_base_url {
            provider = provider.with_base_url(base_url);
        }
        provider
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_news_lookback_days(mut self, days: u64) -> Self {
        self.news_lookback_days = days;
        self
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::ConfigAbsent(PROVIDER_NAME.to_string()))
    }

    /// Make a GET request to the Finnhub API and return the raw body.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.base_url, endpoint);

        log::debug!("Finnhub request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Transport(format!("{endpoint} timed out"))
                } else {
                    ProviderError::Transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::Transport("Rate limit exceeded".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transport(format!("HTTP {status} - {body}")));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read response: {e}")))
    }
}

/// Inclusive date window ending on `today`
pub fn news_window(today: NaiveDate, lookback_days: u64) -> (NaiveDate, NaiveDate) {
    let from = today.checked_sub_days(Days::new(lookback_days)).unwrap_or(today);
    (from, today)
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        if symbol.trim().is_empty() {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }

        let text = self.fetch("/quote", &[("symbol", symbol)]).await?;
        let response: QuoteResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse quote response: {e}")))?;

        let price = response
            .c
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))?;
        let previous_close = response.pc.unwrap_or(0.0);

        if is_sentinel_zero(price, previous_close) {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }

        let change = response.d.unwrap_or(price - previous_close);
        let change_percent = response.dp.unwrap_or_else(|| {
            if previous_close != 0.0 {
                change / previous_close * 100.0
            } else {
                0.0
            }
        });

        Ok(Quote {
            symbol: symbol.to_uppercase(),
            price,
            change,
            change_percent,
            company_name: None,
            open: response.o,
            high: response.h,
            low: response.l,
            previous_close: response.pc,
        })
    }
}

#[async_trait]
impl NewsProvider for FinnhubProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_news(&self, symbol: &str) -> Result<Vec<NewsItem>, ProviderError> {
        let (from, to) = news_window(Utc::now().date_naive(), self.news_lookback_days);
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        let text = self
            .fetch("/company-news", &[("symbol", symbol), ("from", &from), ("to", &to)])
            .await?;

        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse news response: {e}")))?;

        // Error bodies come back as objects; anything but an array means no news
        let Some(items) = body.as_array() else {
            log::warn!("Finnhub news for {symbol} was not an array, treating as empty");
            return Ok(Vec::new());
        };

        let news = items
            .iter()
            .filter_map(|item| serde_json::from_value::<NewsResponseItem>(item.clone()).ok())
            .take(MAX_NEWS_ITEMS)
            .map(|item| NewsItem {
                headline: item.headline,
                summary: item.summary,
                source: item.source,
                url: item.url,
                published_at: item
                    .datetime
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
            })
            .collect();

        Ok(news)
    }
}

#[async_trait]
impl SymbolSource for FinnhubProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn find_symbols(&self, query: &str) -> Result<Vec<RawMatch>, ProviderError> {
        let text = self.fetch("/search", &[("q", query)]).await?;
        let response: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse search response: {e}")))?;

        Ok(response
            .result
            .into_iter()
            .map(|item| RawMatch {
                symbol: item.symbol,
                name: Some(item.description).filter(|d| !d.trim().is_empty()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;

    fn provider_for(server: &MockServer) -> FinnhubProvider {
        FinnhubProvider::new(Some("test_key".to_string()), Duration::from_secs(5))
            .with_base_url(server.base_url())
    }

    #[test]
    fn test_news_window_spans_lookback_inclusive() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let (from, to) = news_window(today, 4);
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
        assert_eq!(to, today);
    }

    #[tokio::test]
    async fn test_get_quote_maps_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/quote")
                .query_param("symbol", "AAPL")
                .header("x-finnhub-token", "test_key");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"c":172.62,"d":-5.48,"dp":-3.08,"h":178.1,"l":171.9,"o":177.5,"pc":178.1,"t":1700000000}"#);
        });

        let quote = provider_for(&server).get_quote("AAPL").await.unwrap();

        mock.assert();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 172.62);
        assert_eq!(quote.change, -5.48);
        assert_eq!(quote.change_percent, -3.08);
        assert_eq!(quote.previous_close, Some(178.1));
        assert!(quote.company_name.is_none());
    }

    #[tokio::test]
    async fn test_get_quote_sentinel_zero_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/quote");
            then.status(200)
                .body(r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#);
        });

        let result = provider_for(&server).get_quote("NOPE").await;
        assert_eq!(result.unwrap_err(), ProviderError::NotFound("NOPE".to_string()));
    }

    #[tokio::test]
    async fn test_get_quote_server_error_is_transport() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/quote");
            then.status(500).body("boom");
        });

        let result = provider_for(&server).get_quote("AAPL").await;
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/quote");
            then.status(200).body("{}");
        });

        let provider =
            FinnhubProvider::new(None, Duration::from_secs(5)).with_base_url(server.base_url());
        let quote = provider.get_quote("AAPL").await;
        let news = provider.get_news("AAPL").await;

        assert!(matches!(quote, Err(ProviderError::ConfigAbsent(_))));
        assert!(matches!(news, Err(ProviderError::ConfigAbsent(_))));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/quote");
            then.status(200).body(r#"{"c":1.0,"pc":1.0}"#);
        });

        for key in ["", "   "] {
            let provider = FinnhubProvider::new(Some(key.to_string()), Duration::from_secs(5))
                .with_base_url(server.base_url());
            let quote = provider.get_quote("AAPL").await;
            assert!(matches!(quote, Err(ProviderError::ConfigAbsent(_))));
        }
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_get_news_caps_at_five_items() {
        let server = MockServer::start();
        let items: Vec<serde_json::Value> = (0..8)
            .map(|i| {
                serde_json::json!({
                    "headline": format!("Headline {i}"),
                    "summary": "summary",
                    "source": "Wire",
                    "url": format!("https://news.example/{i}"),
                    "datetime": 1_700_000_000 + i
                })
            })
            .collect();
        let body = serde_json::Value::Array(items).to_string();
        server.mock(|when, then| {
            when.method(GET).path("/company-news").query_param("symbol", "TSLA");
            then.status(200).body(body);
        });

        let news = provider_for(&server).get_news("TSLA").await.unwrap();

        assert_eq!(news.len(), 5);
        assert_eq!(news[0].headline, "Headline 0");
        assert_eq!(news[4].url, "https://news.example/4");
        assert!(news[0].published_at.is_some());
    }

    #[tokio::test]
    async fn test_get_news_non_array_body_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/company-news");
            then.status(200).body(r#"{"error":"You don't have access to this resource."}"#);
        });

        let news = provider_for(&server).get_news("TSLA").await.unwrap();
        assert!(news.is_empty());
    }

    #[tokio::test]
    async fn test_find_symbols_maps_description_to_name() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search").query_param("q", "apple");
            then.status(200).body(
                r#"{"count":2,"result":[
                    {"description":"APPLE INC","displaySymbol":"AAPL","symbol":"AAPL","type":"Common Stock"},
                    {"description":"","displaySymbol":"APLE","symbol":"APLE","type":"REIT"}
                ]}"#,
            );
        });

        let matches = provider_for(&server).find_symbols("apple").await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name.as_deref(), Some("APPLE INC"));
        assert_eq!(matches[1].name, None);
    }
}
