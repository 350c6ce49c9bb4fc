use std::sync::Arc;

use log::info;
use teloxide::{prelude::*, utils::command::BotCommands};

use stock_snark::StockService;

use crate::commands::{answer, Command};

pub async fn handle_message(
    bot: Bot,
    msg: Message,
    service: Arc<StockService>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        info!("📷 Received non-text message");
        return Ok(());
    };

    // Get bot info to use the correct username for command parsing
    let bot_user = bot.get_me().await?;
    let bot_username = bot_user.username.as_deref().unwrap_or("bot");

    info!("📝 Processing message: '{text}' with bot username: @{bot_username}");

    let bot_mention = format!("@{bot_username}");
    let is_private_chat = msg.chat.is_private();
    let is_mentioned = text.contains(&bot_mention);

    // In groups only messages that mention the bot are answered
    if !is_private_chat && !is_mentioned {
        info!("😶 Group message without bot mention - ignoring");
        return Ok(());
    }

    let processed_text = if is_mentioned {
        let cleaned = text.replace(&bot_mention, "").trim().to_string();
        info!("🧽 Cleaned text after removing mention: '{cleaned}'");
        cleaned
    } else {
        text.trim().to_string()
    };

    match route_text(&processed_text) {
        Route::Command(cmd) => {
            info!("✅ Command parsed successfully: {cmd:?}");
            answer(bot, msg, cmd, service).await?;
        }
        Route::Unknown => {
            info!("❌ Unknown command: '{processed_text}'");
            let response = format!(
                "Unknown command: {}\n\nAvailable commands:\n{}",
                processed_text,
                Command::descriptions()
            );
            bot.send_message(msg.chat.id, response).await?;
        }
        Route::Empty => {
            info!("🙄 Empty message after processing mention");
            let response = format!(
                "Hello! Send me a ticker to roast or a company to search for.\n\n{}",
                Command::descriptions()
            );
            bot.send_message(msg.chat.id, response).await?;
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Route {
    Command(Command),
    Unknown,
    Empty,
}

/// Decide what a cleaned message asks for. Plain text is a search query.
fn route_text(text: &str) -> Route {
    if let Ok(cmd) = Command::parse(text, "") {
        Route::Command(cmd)
    } else if text.starts_with('/') {
        Route::Unknown
    } else if !text.trim().is_empty() {
        info!("🔄 No command detected - treating '{text}' as a search");
        Route::Command(Command::Search(text.to_string()))
    } else {
        Route::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_becomes_search() {
        assert_eq!(route_text("tesla"), Route::Command(Command::Search("tesla".to_string())));
    }

    #[test]
    fn test_known_and_unknown_commands() {
        assert_eq!(route_text("/snark GME"), Route::Command(Command::Snark("GME".to_string())));
        assert_eq!(route_text("/moon"), Route::Unknown);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(route_text(""), Route::Empty);
    }
}
