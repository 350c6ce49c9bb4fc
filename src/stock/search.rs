use std::sync::Arc;

use futures::future::join_all;

use super::provider::{ProviderError, QuoteProvider, SearchCandidate, SymbolSource};

/// Raw matches considered per query
pub const MAX_RAW_MATCHES: usize = 5;

/// Symbol search that only returns symbols the quote provider can price.
///
/// Each raw text match is checked with a quote lookup; all lookups run
/// concurrently and every one is awaited before the misses are dropped.
pub struct SymbolSearch {
    source: Arc<dyn SymbolSource>,
    quotes: Arc<dyn QuoteProvider>,
}

impl SymbolSearch {
    pub fn new(source: Arc<dyn SymbolSource>, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self { source, quotes }
    }

    /// Resolve a free-text query to quotable candidates.
    ///
    /// Blank queries return nothing without a request. Upstream failures
    /// are logged and yield an empty list.
    pub async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let raw_matches = match self.source.find_symbols(query).await {
            Ok(matches) => matches,
            Err(ProviderError::ConfigAbsent(provider)) => {
                log::debug!("Symbol search skipped, {provider} is not configured");
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Symbol search for '{query}' via {} failed: {e}", self.source.name());
                return Vec::new();
            }
        };

        let lookups = raw_matches
            .into_iter()
            .take(MAX_RAW_MATCHES)
            .map(|raw| async move {
                match self.quotes.get_quote(&raw.symbol).await {
                    Ok(_) => Some(SearchCandidate {
                        symbol: raw.symbol,
                        company_name: raw.name,
                    }),
                    Err(e) => {
                        log::debug!("Dropping search match {}: {e}", raw.symbol);
                        None
                    }
                }
            });

        let candidates: Vec<SearchCandidate> =
            join_all(lookups).await.into_iter().flatten().collect();

        log::info!("🔎 Search '{query}' resolved {} quotable candidates", candidates.len());
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::provider::{Quote, RawMatch};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        matches: Vec<RawMatch>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(symbols: &[&str]) -> Self {
            Self {
                matches: symbols
                    .iter()
                    .map(|s| RawMatch {
                        symbol: s.to_string(),
                        name: Some(format!("{s} Corp")),
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SymbolSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn find_symbols(&self, _query: &str) -> Result<Vec<RawMatch>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.matches.clone())
        }
    }

    struct KnownQuotes(HashSet<&'static str>);

    #[async_trait]
    impl QuoteProvider for KnownQuotes {
        fn name(&self) -> &str {
            "known"
        }

        async fn get_quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
            if self.0.contains(symbol) {
                Ok(Quote::new(symbol, 10.0, 0.1, 1.0))
            } else {
                Err(ProviderError::NotFound(symbol.to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_unquotable_matches_are_dropped() {
        let source = Arc::new(FixedSource::new(&["AAA", "BBB", "CCC", "DDD", "EEE"]));
        let quotes = Arc::new(KnownQuotes(["AAA", "CCC", "EEE"].into_iter().collect()));
        let search = SymbolSearch::new(source, quotes);

        let results = search.search("letters").await;

        let symbols: Vec<&str> = results.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "CCC", "EEE"]);
        assert_eq!(results[1].company_name.as_deref(), Some("CCC Corp"));
    }

    #[tokio::test]
    async fn test_blank_query_skips_upstream() {
        let source = Arc::new(FixedSource::new(&["AAA"]));
        let search = SymbolSearch::new(source.clone(), Arc::new(KnownQuotes(HashSet::new())));

        assert!(search.search("   ").await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_only_first_five_matches_are_considered() {
        let source = Arc::new(FixedSource::new(&["A1", "A2", "A3", "A4", "A5", "A6", "A7"]));
        let quotes = Arc::new(KnownQuotes(
            ["A1", "A2", "A3", "A4", "A5", "A6", "A7"].into_iter().collect(),
        ));
        let search = SymbolSearch::new(source, quotes);

        assert_eq!(search.search("a").await.len(), MAX_RAW_MATCHES);
    }

    #[tokio::test]
    async fn test_source_failure_yields_empty() {
        struct Broken;

        #[async_trait]
        impl SymbolSource for Broken {
            fn name(&self) -> &str {
                "broken"
            }

            async fn find_symbols(&self, _query: &str) -> Result<Vec<RawMatch>, ProviderError> {
                Err(ProviderError::Transport("connection reset".to_string()))
            }
        }

        let search = SymbolSearch::new(Arc::new(Broken), Arc::new(KnownQuotes(HashSet::new())));
        assert!(search.search("apple").await.is_empty());
    }
}
