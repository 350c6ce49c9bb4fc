//! Satirical stock lookups: quotes, news and a generated excuse for
//! whatever the ticker just did.
//!
//! The core entry point is [`stock::StockService`], which aggregates a
//! quote, recent news and generated satire into one [`stock::StockDetails`]
//! record per symbol.

pub mod ai;
pub mod config;
pub mod satire;
pub mod stock;

pub use config::{AppConfig, ConfigError};
pub use stock::{DetailsError, StockDetails, StockService};
