use std::env;
use std::sync::Arc;

use log::info;
use teloxide::prelude::*;

#[cfg(feature = "axum-server")]
use axum::{routing::get, routing::post, Router};

use stock_snark::StockService;

use crate::handlers::handle_message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Webhook,
    Polling,
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Webhook => write!(f, "WEBHOOK (Production)"),
            DeploymentMode::Polling => write!(f, "POLLING (Development)"),
        }
    }
}

fn is_production<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let is = |key: &str, value: &str| lookup(key).map(|v| v == value).unwrap_or(false);
    let set = |key: &str| lookup(key).is_some();

    set("RAILWAY_ENVIRONMENT")
        || set("HEROKU_APP_NAME")
        || set("VERCEL")
        || is("ENVIRONMENT", "production")
        || is("DEPLOYMENT_ENV", "production")
        // PORT alone is too common; a cloud host sets it together with WEBHOOK_URL
        || (set("PORT") && set("WEBHOOK_URL"))
        || is("WEBHOOK_MODE", "true")
}

pub fn is_production_environment() -> bool {
    is_production(|key| env::var(key).ok())
}

pub fn detect_deployment_mode() -> DeploymentMode {
    if is_production_environment() {
        DeploymentMode::Webhook
    } else {
        DeploymentMode::Polling
    }
}

#[cfg(feature = "axum-server")]
pub async fn run_webhook_mode(
    bot: Bot,
    service: Arc<StockService>,
) -> Result<(), Box<dyn std::error::Error>> {
    use axum::extract::State;
    use axum::response::Html;
    use axum::Json;

    use crate::api::{self, AppState};

    async fn health_check() -> Html<&'static str> {
        Html("<h1>StockSnark is running!</h1>")
    }

    async fn webhook_handler(
        State(state): State<AppState>,
        Json(update): Json<teloxide::types::Update>,
    ) -> &'static str {
        info!("🔗 Webhook received update: {:?}", update.id);

        if let teloxide::types::UpdateKind::Message(message) = update.kind {
            if let Err(e) = handle_message(state.bot, message, state.service).await {
                log::warn!("❌ Failed to handle webhook message: {e}");
            }
        } else {
            info!("🔄 Received non-message update in webhook");
        }
        "OK"
    }

    let webhook_url = env::var("WEBHOOK_URL")
        .map_err(|_| "WEBHOOK_URL must be set for webhook mode")?;
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|_| "PORT must be a valid number")?;

    info!("🌐 Production environment detected - running in WEBHOOK mode");
    info!("🔗 Setting up webhook at: {webhook_url}");

    bot.set_webhook(webhook_url.parse()?)
        .await
        .map_err(|e| format!("Failed to set webhook: {e}"))?;

    let app = Router::new()
        .route("/", get(health_check))
        .route("/webhook", post(webhook_handler))
        .merge(api::router())
        .with_state(AppState { bot, service });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| format!("Failed to bind to port: {e}"))?;

    info!("👂 Webhook server listening on port {port} - ready to receive updates!");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server failed: {e}").into())
}

pub async fn run_polling_mode(bot: Bot, service: Arc<StockService>) {
    info!("🔄 Development environment detected - running in POLLING mode");
    info!("👂 Starting polling loop - ready to receive updates!");

    let handler = Update::filter_message().endpoint(handle_message);
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
