use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

use super::demo;
use super::provider::{
    NewsItem, NewsProvider, ProviderError, ProviderFactory, Quote, QuoteProvider, SearchCandidate,
    SymbolSource, MAX_NEWS_ITEMS,
};
use super::search::SymbolSearch;
use crate::ai::{create_ai_backend, AiBackend};
use crate::config::{AppConfig, ConfigError};
use crate::satire::{select_headline, SatireGenerator};

/// Multipliers for the placeholder sparkline. Not historical data.
const CHART_WIGGLE: [f64; 5] = [1.0, 1.01, 0.98, 1.02, 0.99];

/// The only failure a details lookup reports
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetailsError {
    #[error("No details available for {0}")]
    NotFound(String),
}

/// Everything needed to render one stock card.
///
/// `id` always equals `quote.symbol`. `chart_data`, when present, has at
/// least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetails {
    pub id: String,
    /// Display name, falls back to the symbol
    pub name: String,
    #[serde(flatten)]
    pub quote: Quote,
    pub sarcastic_reason: String,
    pub news_headline: String,
    pub mock_tweet: String,
    pub latest_news: Vec<NewsItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<f64>>,
}

impl StockDetails {
    pub fn symbol(&self) -> &str {
        &self.quote.symbol
    }
}

/// Placeholder chart points around `price`, or `None` if the price is not finite
pub fn synthesize_chart_data(price: f64) -> Option<Vec<f64>> {
    if !price.is_finite() {
        return None;
    }
    Some(CHART_WIGGLE.iter().map(|factor| price * factor).collect())
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Stock service for handling stock operations
pub struct StockService {
    quotes: Arc<dyn QuoteProvider>,
    news: Arc<dyn NewsProvider>,
    search: SymbolSearch,
    satire: SatireGenerator,
    trending_symbols: Vec<String>,
}

impl StockService {
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        news: Arc<dyn NewsProvider>,
        symbols: Arc<dyn SymbolSource>,
        ai_backend: Option<Arc<dyn AiBackend>>,
    ) -> Self {
        Self {
            search: SymbolSearch::new(symbols, quotes.clone()),
            quotes,
            news,
            satire: SatireGenerator::new(ai_backend),
            trending_symbols: Vec::new(),
        }
    }

    /// Wire up providers and the AI backend from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let providers = ProviderFactory::from_config(config)?;

        log::info!(
            "📊 Stock service using {} for quotes, {} for search, {} for news",
            providers.quotes.name(),
            providers.symbols.name(),
            providers.news.name()
        );

        let ai_backend = create_ai_backend(config);
        Ok(Self::new(providers.quotes, providers.news, providers.symbols, ai_backend)
            .with_trending_symbols(config.trending_symbols.clone()))
    }

    pub fn with_trending_symbols(mut self, symbols: Vec<String>) -> Self {
        self.trending_symbols = symbols;
        self
    }

    /// Build the full card for a symbol.
    ///
    /// Fails only when no quote can be found. A panic while assembling is
    /// reported as not found as well.
    pub async fn get_details(&self, symbol: &str) -> Result<StockDetails, DetailsError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(DetailsError::NotFound(symbol));
        }

        match AssertUnwindSafe(self.build_details(&symbol)).catch_unwind().await {
            Ok(result) => result,
            Err(_) => {
                log::error!("❌ Details pipeline panicked for {symbol}");
                Err(DetailsError::NotFound(symbol))
            }
        }
    }

    async fn build_details(&self, symbol: &str) -> Result<StockDetails, DetailsError> {
        log::info!("📈 Building details for {symbol}");

        // Both lookups settle before either result is inspected
        let (quote, news) = tokio::join!(
            self.quotes.get_quote(symbol),
            self.news.get_news(symbol)
        );

        let mut quote = match quote {
            Ok(quote) => quote,
            Err(ProviderError::ConfigAbsent(provider)) => {
                return match demo::find(symbol) {
                    Some(stock) => {
                        log::info!(
                            "🎭 {provider} is not configured, serving built-in card for {symbol}"
                        );
                        Ok(stock.details())
                    }
                    None => {
                        log::warn!("❌ No quote for {symbol}, {provider} is not configured");
                        Err(DetailsError::NotFound(symbol.to_string()))
                    }
                };
            }
            Err(e) => {
                log::warn!("❌ No quote for {symbol} from {}: {e}", self.quotes.name());
                return Err(DetailsError::NotFound(symbol.to_string()));
            }
        };
        quote.symbol = symbol.to_string();

        let latest_news = news_or_empty(symbol, news);

        let satire = self.satire.generate(&quote, &latest_news).await;
        let news_headline = select_headline(&quote, &latest_news);
        let chart_data = synthesize_chart_data(quote.price);
        let name = self.display_name(&quote).await;

        log::info!(
            "✅ Details ready for {symbol}: ${:.2} ({:+.2}%), {} news items",
            quote.price,
            quote.change_percent,
            latest_news.len()
        );

        Ok(StockDetails {
            id: quote.symbol.clone(),
            name,
            quote,
            sarcastic_reason: satire.reason,
            news_headline,
            mock_tweet: satire.tweet,
            latest_news,
            chart_data,
        })
    }

    /// Company name from the quote, else from an exact search echo, else the symbol
    async fn display_name(&self, quote: &Quote) -> String {
        if let Some(name) = quote.company_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }

        self.search
            .search(&quote.symbol)
            .await
            .into_iter()
            .filter(|candidate| candidate.symbol == quote.symbol)
            .filter_map(|candidate| candidate.company_name)
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| quote.symbol.clone())
    }

    /// Get stock quote for a symbol
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(ProviderError::NotFound(symbol));
        }

        log::info!("Fetching quote for symbol: {symbol}");

        match self.quotes.get_quote(&symbol).await {
            Ok(quote) => {
                log::info!("Successfully fetched quote for {}: ${:.2}", symbol, quote.price);
                Ok(quote)
            }
            Err(e) => {
                log::error!("Failed to fetch quote for {symbol}: {e:?}");
                Err(e)
            }
        }
    }

    /// Recent news for a symbol; failures read as no news
    pub async fn get_news(&self, symbol: &str) -> Vec<NewsItem> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Vec::new();
        }
        let news = self.news.get_news(&symbol).await;
        news_or_empty(&symbol, news)
    }

    /// Quotable symbols matching a free-text query
    pub async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        self.search.search(query).await
    }

    /// Watchlist quotes, worst performer first.
    ///
    /// Without a configured quote provider the built-in cards stand in.
    /// Missing company names are filled in from them too.
    pub async fn trending(&self) -> Vec<Quote> {
        let lookups = self.trending_symbols.iter().map(|symbol| async move {
            match self.quotes.get_quote(symbol).await {
                Ok(mut quote) => {
                    if quote.company_name.is_none() {
                        quote.company_name = demo::company_name(symbol).map(str::to_string);
                    }
                    Some(quote)
                }
                Err(ProviderError::ConfigAbsent(_)) => {
                    demo::find(symbol).map(|stock| stock.quote())
                }
                Err(e) => {
                    log::warn!("⚠️ Skipping {symbol} on trending board: {e}");
                    None
                }
            }
        });

        let mut quotes: Vec<Quote> = join_all(lookups).await.into_iter().flatten().collect();
        quotes.sort_by(|a, b| a.change_percent.total_cmp(&b.change_percent));
        quotes
    }
}

fn news_or_empty(symbol: &str, news: Result<Vec<NewsItem>, ProviderError>) -> Vec<NewsItem> {
    match news {
        Ok(mut items) => {
            items.truncate(MAX_NEWS_ITEMS);
            items
        }
        Err(ProviderError::ConfigAbsent(provider)) => {
            log::debug!("News skipped for {symbol}, {provider} is not configured");
            Vec::new()
        }
        Err(e) => {
            log::warn!("⚠️ News lookup for {symbol} failed: {e}");
            Vec::new()
        }
    }
}
