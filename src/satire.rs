//! Satire generation: a sarcastic "reason" and a fake tweet for a quote.
//!
//! The generative backend is optional and allowed to fail; any failure
//! falls back to canned lines derived from the quote alone, so callers
//! always get text back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ai::AiBackend;
use crate::stock::provider::{NewsItem, Quote};

/// News items quoted to the backend as context
const PROMPT_NEWS_ITEMS: usize = 3;

const EARNINGS_KEYWORDS: &[&str] = &["earnings", "quarterly", "profit"];
const MARKET_KEYWORDS: &[&str] = &["market", "stock", "price"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SatireText {
    pub reason: String,
    pub tweet: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SatireError {
    #[error("No AI backend configured")]
    BackendUnavailable,
    #[error("AI backend error: {0}")]
    Backend(String),
    #[error("Could not parse satire response: {0}")]
    Parse(String),
}

pub struct SatireGenerator {
    backend: Option<Arc<dyn AiBackend>>,
}

impl SatireGenerator {
    pub fn new(backend: Option<Arc<dyn AiBackend>>) -> Self {
        Self { backend }
    }

    /// Generate satire for a quote, falling back to canned lines on any error
    pub async fn generate(&self, quote: &Quote, news: &[NewsItem]) -> SatireText {
        match self.try_generate(quote, news).await {
            Ok(text) => text,
            Err(SatireError::BackendUnavailable) => fallback_satire(quote),
            Err(e) => {
                log::warn!("⚠️ Satire generation failed for {}: {e}", quote.symbol);
                fallback_satire(quote)
            }
        }
    }

    async fn try_generate(
        &self,
        quote: &Quote,
        news: &[NewsItem],
    ) -> Result<SatireText, SatireError> {
        let backend = self.backend.as_ref().ok_or(SatireError::BackendUnavailable)?;

        let prompt = build_prompt(quote, news);
        log::debug!("Requesting satire for {} from {}", quote.symbol, backend.name());

        let raw = backend
            .chat(&prompt)
            .await
            .map_err(|e| SatireError::Backend(e.to_string()))?;

        parse_satire(&raw)
    }
}

pub fn build_prompt(quote: &Quote, news: &[NewsItem]) -> String {
    let news_context = news
        .iter()
        .take(PROMPT_NEWS_ITEMS)
        .map(|item| format!("Headline: {}\nSummary: {}", item.headline, item.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    let previous_close = quote
        .previous_close
        .map(|pc| format!("${pc:.2}"))
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "You are a sarcastic financial commentator who mocks how analysts always explain a stock move after it happens.\n\
         \n\
         Stock: {}\n\
         Price: ${:.2}\n\
         Change: {:.2}%\n\
         Previous Close: {}\n\
         \n\
         Recent News:\n\
         {}\n\
         \n\
         Reply with JSON only, in exactly this shape:\n\
         {{\"reason\": \"satirical reason for the move\", \"tweet\": \"mock tweet about it\"}}\n\
         Each value must be a single sentence of at most 100 characters. \
         The reason should sound like something a real analyst would say, but be obviously ridiculous.",
        quote.symbol,
        quote.price,
        quote.change_percent,
        previous_close,
        if news_context.is_empty() { "None" } else { news_context.as_str() },
    )
}

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag such as `json`
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Parse a backend reply into [`SatireText`].
///
/// Both fields must be present and non-blank.
pub fn parse_satire(raw: &str) -> Result<SatireText, SatireError> {
    let text: SatireText =
        serde_json::from_str(strip_code_fences(raw))
            .map_err(|e| SatireError::Parse(e.to_string()))?;

    if text.reason.trim().is_empty() || text.tweet.trim().is_empty() {
        return Err(SatireError::Parse("empty reason or tweet".to_string()));
    }

    Ok(SatireText {
        reason: text.reason.trim().to_string(),
        tweet: text.tweet.trim().to_string(),
    })
}

fn mentions_any(headline: &str, keywords: &[&str]) -> bool {
    let headline = headline.to_lowercase();
    keywords.iter().any(|keyword| headline.contains(keyword))
}

/// Pick the headline to display next to a quote.
///
/// Earnings-flavoured news wins over general market news, which wins over
/// whatever arrived first. With no news at all a headline is made up.
pub fn select_headline(quote: &Quote, news: &[NewsItem]) -> String {
    news.iter()
        .find(|item| mentions_any(&item.headline, EARNINGS_KEYWORDS))
        .or_else(|| news.iter().find(|item| mentions_any(&item.headline, MARKET_KEYWORDS)))
        .or_else(|| news.first())
        .map(|item| item.headline.clone())
        .unwrap_or_else(|| {
            let direction = if quote.change_percent > 0.0 { "rises" } else { "falls" };
            format!(
                "{} stock {} {:.2}%. More at 11.",
                quote.symbol,
                direction,
                quote.change_percent.abs()
            )
        })
}

/// Canned satire used whenever generation is unavailable
pub fn fallback_satire(quote: &Quote) -> SatireText {
    let symbol = &quote.symbol;
    let pct = quote.change_percent.abs();

    if quote.change_percent > 0.0 {
        SatireText {
            reason: format!(
                "Analysts attribute {symbol}'s {pct:.2}% rise to investors finally reading \
                 past the first page of the annual report."
            ),
            tweet: format!(
                "Bought ${symbol} yesterday, up {pct:.2}% today. \
                 I accept speaking invitations. #Genius"
            ),
        }
    } else if quote.change_percent < 0.0 {
        SatireText {
            reason: format!(
                "Analysts explain {symbol}'s {pct:.2}% drop as a healthy correction, \
                 which is what they call any drop."
            ),
            tweet: format!(
                "${symbol} down {pct:.2}%. Not a loss until I check my account, so never. \
                 #DiamondHands"
            ),
        }
    } else {
        SatireText {
            reason: format!(
                "Analysts call {symbol}'s flat day a sign of stability, \
                 having run out of other words."
            ),
            tweet: format!(
                "${symbol} did absolutely nothing today and somehow I still lost money on fees. \
                 #Investing"
            ),
        }
    }
}
