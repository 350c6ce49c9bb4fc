//! JSON endpoints served next to the webhook, for web front ends.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use teloxide::Bot;

use stock_snark::stock::{Quote, SearchCandidate};
use stock_snark::{StockDetails, StockService};

#[derive(Clone)]
pub struct AppState {
    pub bot: Bot,
    pub service: Arc<StockService>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/:symbol", get(stock_details))
        .route("/api/search", get(search))
        .route("/api/trending", get(trending))
}

async fn stock_details(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockDetails>, (StatusCode, Json<Value>)> {
    info!("🌐 API details request for {symbol}");
    state
        .service
        .get_details(&symbol)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() }))))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchCandidate>> {
    info!("🌐 API search request for '{}'", params.q);
    Json(state.service.search(&params.q).await)
}

async fn trending(State(state): State<AppState>) -> Json<Vec<Quote>> {
    Json(state.service.trending().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_snark::AppConfig;

    // No credentials configured, so every provider answers without the network
    fn unconfigured_state() -> AppState {
        let service = StockService::from_config(&AppConfig::default()).unwrap();
        AppState {
            bot: Bot::new("123456:TEST"),
            service: Arc::new(service),
        }
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_404() {
        let result = stock_details(State(unconfigured_state()), Path("ZZZZ".to_string())).await;

        let (status, Json(body)) = result.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No details available for ZZZZ");
    }

    #[tokio::test]
    async fn test_built_in_card_served_without_credentials() {
        let result = stock_details(State(unconfigured_state()), Path("aapl".to_string())).await;

        let Json(details) = result.unwrap();
        assert_eq!(details.id, "AAPL");
        assert_eq!(details.name, "Apple Inc.");
        assert!(details.chart_data.is_some());
    }

    #[tokio::test]
    async fn test_search_without_provider_is_empty() {
        let params = SearchParams { q: "apple".to_string() };
        let Json(results) = search(State(unconfigured_state()), Query(params)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_trending_without_provider_lists_built_in_cards() {
        let Json(quotes) = trending(State(unconfigured_state())).await;

        assert_eq!(quotes.len(), 7);
        assert_eq!(quotes[0].symbol, "GME");
        assert!(quotes.iter().all(|q| q.company_name.is_some()));
    }
}
