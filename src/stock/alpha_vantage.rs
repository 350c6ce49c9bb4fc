use super::provider::{
    is_sentinel_zero, ProviderError, Quote, QuoteProvider, RawMatch, SymbolSource,
};
use crate::config::AppConfig;
use alpha_vantage::api::ApiClient;
use async_trait::async_trait;
use std::time::Duration;

const PROVIDER_NAME: &str = "Alpha Vantage";

/// Alpha Vantage quote and symbol-search provider using the `alpha_vantage` crate
pub struct AlphaVantageProvider {
    client: Option<ApiClient>,
}

impl AlphaVantageProvider {
    /// Create a provider; without a key it stays unconfigured
    pub fn new(api_key: Option<&str>, timeout: Duration) -> Self {
        let client = api_key.filter(|key| !key.is_empty()).map(|key| {
            let http_client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new());
            ApiClient::set_api(key, http_client)
        });

        if client.is_some() {
            log::info!("Alpha Vantage provider initialized successfully");
        }

        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.alpha_vantage_api_key.as_deref(), config.http_timeout)
    }

    /// Get the client, or report that no key was configured
    fn get_client(&self) -> Result<&ApiClient, ProviderError> {
        self.client
            .as_ref()
            .ok_or_else(|| ProviderError::ConfigAbsent(PROVIDER_NAME.to_string()))
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let client = self.get_client()?;

        log::debug!("Fetching quote for symbol: {}", symbol);

        let quote = client.quote(symbol).json().await?;

        if is_sentinel_zero(quote.price(), quote.previous()) {
            return Err(ProviderError::NotFound(symbol.to_string()));
        }

        // GLOBAL_QUOTE carries no company name
        Ok(Quote {
            symbol: quote.symbol().to_uppercase(),
            price: quote.price(),
            change: quote.change(),
            change_percent: quote.change_percent(),
            company_name: None,
            open: Some(quote.open()),
            high: Some(quote.high()),
            low: Some(quote.low()),
            previous_close: Some(quote.previous()),
        })
    }
}

#[async_trait]
impl SymbolSource for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn find_symbols(&self, query: &str) -> Result<Vec<RawMatch>, ProviderError> {
        let client = self.get_client()?;

        log::debug!("Searching symbols for query: {}", query);

        let search = client.search(query).json().await?;

        Ok(search
            .matches()
            .iter()
            .map(|entry| RawMatch {
                symbol: entry.symbol().to_string(),
                name: Some(entry.name().to_string()).filter(|name| !name.trim().is_empty()),
            })
            .collect())
    }
}
