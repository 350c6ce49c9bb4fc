use std::sync::Arc;

use log::{info, warn};
use teloxide::{prelude::*, utils::command::BotCommands};

use stock_snark::stock::{
    format_details_error, format_news, format_search_results, format_stock_card, format_stock_error,
    format_stock_quote, format_trending, StockService,
};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "display this text.")]
    Help,
    #[command(description = "the full story behind a stock move - use '/snark AAPL'.")]
    Snark(String),
    #[command(description = "get current stock price - use '/price AAPL' for Apple stock.")]
    Price(String),
    #[command(description = "get latest news for a stock - use '/news AAPL' for Apple news.")]
    News(String),
    #[command(description = "find a ticker by name - use '/search apple'.")]
    Search(String),
    #[command(description = "today's trending disasters.")]
    Trending,
}

/// Usage hint for commands that need an argument, if it is missing
fn missing_argument(cmd: &Command) -> Option<&'static str> {
    match cmd {
        Command::Snark(s) if s.trim().is_empty() => {
            Some("Please provide a stock symbol. Example: /snark AAPL")
        }
        Command::Price(s) if s.trim().is_empty() => {
            Some("Please provide a stock symbol. Example: /price AAPL")
        }
        Command::News(s) if s.trim().is_empty() => {
            Some("Please provide a stock symbol. Example: /news AAPL")
        }
        Command::Search(s) if s.trim().is_empty() => {
            Some("Please provide a company name or ticker. Example: /search apple")
        }
        _ => None,
    }
}

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: Arc<StockService>,
) -> ResponseResult<()> {
    let chat_type = match msg.chat.is_private() {
        true => "Private",
        false => match msg.chat.is_group() {
            true => "Group",
            false => match msg.chat.is_supergroup() {
                true => "Supergroup",
                false => "Channel",
            },
        },
    };

    let username = msg
        .from
        .as_ref()
        .and_then(|user| user.username.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("<no_username>");

    info!(
        "📨 Received command in {} chat (ID: {}) from @{}: {:?}",
        chat_type, msg.chat.id, username, cmd
    );

    if let Some(usage) = missing_argument(&cmd) {
        info!("📤 Sending usage help to chat {}", msg.chat.id);
        bot.send_message(msg.chat.id, usage).await?;
        return Ok(());
    }

    if cmd != Command::Help {
        bot.send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing).await?;
    }

    let response = match cmd {
        Command::Help => Command::descriptions().to_string(),
        Command::Snark(symbol) => match service.get_details(&symbol).await {
            Ok(details) => {
                info!("📤 Sending card to chat {} for {}", msg.chat.id, details.symbol());
                format_stock_card(&details)
            }
            Err(e) => {
                warn!("❌ Details request failed for chat {} ({}): {e}", msg.chat.id, symbol);
                format_details_error(&e)
            }
        },
        Command::Price(symbol) => match service.get_quote(&symbol).await {
            Ok(quote) => {
                info!(
                    "📤 Sending stock quote to chat {} for {}: ${:.2}",
                    msg.chat.id, quote.symbol, quote.price
                );
                format_stock_quote(&quote)
            }
            Err(e) => {
                warn!(
                    "❌ Stock quote request failed for chat {} ({}): {:?}",
                    msg.chat.id, symbol, e
                );
                format_stock_error(&e, &symbol)
            }
        },
        Command::News(symbol) => {
            let news = service.get_news(&symbol).await;
            info!("📤 Sending {} news items to chat {} for {}", news.len(), msg.chat.id, symbol);
            format_news(&symbol, &news)
        }
        Command::Search(query) => {
            // Results are listed only; picking one is left to the user
            let candidates = service.search(&query).await;
            info!(
                "📤 Sending {} search results to chat {} for '{}'",
                candidates.len(),
                msg.chat.id,
                query
            );
            format_search_results(&query, &candidates)
        }
        Command::Trending => {
            let quotes = service.trending().await;
            info!("📤 Sending trending board to chat {} ({} quotes)", msg.chat.id, quotes.len());
            format_trending(&quotes)
        }
    };

    bot.send_message(msg.chat.id, response).await?;
    Ok(())
}
