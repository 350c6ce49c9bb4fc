/// Stock market data functionality
pub mod provider;
pub mod alpha_vantage;
pub mod demo;
pub mod finnhub;
pub mod format;
pub mod search;
pub mod service;

// Re-export commonly used types
pub use provider::{
    NewsItem, NewsProvider, ProviderError, ProviderFactory, ProviderSet, Quote, QuoteProvider,
    RawMatch, SearchCandidate, SymbolSource,
};
pub use alpha_vantage::AlphaVantageProvider;
pub use demo::DemoStock;
pub use finnhub::FinnhubProvider;
pub use format::{
    format_details_error, format_news, format_search_results, format_stock_card, format_stock_error,
    format_stock_quote, format_trending,
};
pub use search::SymbolSearch;
pub use service::{DetailsError, StockDetails, StockService};
