use std::sync::Arc;

use log::info;
use teloxide::prelude::*;

use stock_snark::{AppConfig, StockService};

#[cfg(feature = "axum-server")]
mod api;
mod commands;
mod deployment;
mod handlers;

use deployment::{detect_deployment_mode, run_polling_mode, DeploymentMode};

#[cfg(feature = "axum-server")]
use deployment::run_webhook_mode;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();
    info!("Starting StockSnark bot...");

    let config = AppConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    let service = StockService::from_config(&config)
        .unwrap_or_else(|e| panic!("Stock service failed to start: {e}"));
    let service = Arc::new(service);

    let bot = Bot::from_env();
    let deployment_mode = detect_deployment_mode();

    info!("🚀 Bot deployment detection: {deployment_mode}");

    let result: Result<(), Box<dyn std::error::Error>> = match deployment_mode {
        DeploymentMode::Webhook => {
            #[cfg(feature = "axum-server")]
            {
                run_webhook_mode(bot, service).await
            }
            #[cfg(not(feature = "axum-server"))]
            {
                panic!(
                    "Production environment detected but axum-server feature not enabled. \
                     Compile with --features axum-server"
                );
            }
        }
        DeploymentMode::Polling => {
            run_polling_mode(bot, service).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        panic!("Bot failed to start: {e}");
    }
}
