use super::provider::{NewsItem, ProviderError, Quote, SearchCandidate};
use super::service::{DetailsError, StockDetails};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a series as a one-line sparkline, min/max normalised.
///
/// Returns `None` for fewer than two finite points.
pub fn sparkline(values: &[f64]) -> Option<String> {
    if values.len() < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    Some(
        values
            .iter()
            .map(|value| {
                // A flat series sits in the middle
                let level = if range == 0.0 {
                    SPARK_LEVELS.len() / 2
                } else {
                    (((value - min) / range) * top).round() as usize
                };
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            })
            .collect(),
    )
}

fn trend_emoji(change: f64) -> &'static str {
    if change > 0.0 {
        "📈"
    } else if change < 0.0 {
        "📉"
    } else {
        "➡️"
    }
}

fn sign(value: f64) -> &'static str {
    if value >= 0.0 { "+" } else { "" }
}

fn price_line(quote: &Quote) -> String {
    format!(
        "${:.2} ({}{:.2}, {}{:.2}%)",
        quote.price,
        sign(quote.change),
        quote.change,
        sign(quote.change_percent),
        quote.change_percent
    )
}

fn news_line(item: &NewsItem) -> String {
    if item.url.is_empty() {
        format!("• {}", item.headline)
    } else {
        format!("• {}\n  {}", item.headline, item.url)
    }
}

/// Full card for `/snark`
pub fn format_stock_card(details: &StockDetails) -> String {
    let quote = &details.quote;
    let mut card = format!(
        "{} {} · {}\n{}",
        trend_emoji(quote.change),
        details.symbol(),
        details.name,
        price_line(quote)
    );

    if let Some(chart) = details.chart_data.as_deref().and_then(sparkline) {
        card.push_str(&format!("\n{chart}"));
    }

    card.push_str(&format!("\n\n📰 {}", details.news_headline));
    card.push_str(&format!("\n\n🤔 Why it moved: {}", details.sarcastic_reason));
    card.push_str(&format!("\n\n🐦 \"{}\"", details.mock_tweet));

    if !details.latest_news.is_empty() {
        card.push_str("\n\nLatest news:\n");
        let lines: Vec<String> = details.latest_news.iter().map(news_line).collect();
        card.push_str(&lines.join("\n"));
    }

    card.push_str("\n\nThis is satire. Not financial advice, obviously.");
    card
}

/// Format stock quote for display
pub fn format_stock_quote(quote: &Quote) -> String {
    let optional = |label: &str, value: Option<f64>| {
        value
            .map(|v| format!("\n{label}: ${v:.2}"))
            .unwrap_or_default()
    };

    format!(
        "{} {} Stock Quote\n\nPrice: {}{}{}{}{}",
        trend_emoji(quote.change),
        quote.symbol,
        price_line(quote),
        optional("Open", quote.open),
        optional("High", quote.high),
        optional("Low", quote.low),
        optional("Previous Close", quote.previous_close),
    )
}

pub fn format_news(symbol: &str, news: &[NewsItem]) -> String {
    let symbol = symbol.trim().to_uppercase();
    if news.is_empty() {
        return format!("📰 {symbol} News\n\nNothing in the last few days. Suspiciously quiet.");
    }

    let lines: Vec<String> = news.iter().map(news_line).collect();
    format!("📰 {symbol} News\n\n{}", lines.join("\n"))
}

pub fn format_search_results(query: &str, candidates: &[SearchCandidate]) -> String {
    if candidates.is_empty() {
        return format!(
            "🙁 No stocks found for \"{}\".\nEven our sarcasm has limits. Try another search term.",
            query.trim()
        );
    }

    let lines: Vec<String> = candidates
        .iter()
        .map(|candidate| match &candidate.company_name {
            Some(name) => {
                format!("• {} ({}) → /snark {}", name, candidate.symbol, candidate.symbol)
            }
            None => format!("• {} → /snark {}", candidate.symbol, candidate.symbol),
        })
        .collect();

    format!("🔎 Results for \"{}\":\n\n{}", query.trim(), lines.join("\n"))
}

/// "Trending disasters" board; expects quotes already sorted
pub fn format_trending(quotes: &[Quote]) -> String {
    if quotes.is_empty() {
        return "📉 Trending Disasters\n\nNo quotes available right now. Even the disasters are on break.".to_string();
    }

    let lines: Vec<String> = quotes
        .iter()
        .enumerate()
        .map(|(i, quote)| {
            let name = match &quote.company_name {
                Some(name) => format!(" ({name})"),
                None => String::new(),
            };
            format!(
                "{}. {}{} {}{:.2}% ({}${:.2})",
                i + 1,
                quote.symbol,
                name,
                sign(quote.change_percent),
                quote.change_percent,
                if quote.change < 0.0 { "-" } else { "+" },
                quote.change.abs()
            )
        })
        .collect();

    format!("📉 Trending Disasters\n\n{}", lines.join("\n"))
}

fn symbol_suggestion(symbol: &str) -> &'static str {
    match symbol {
        "APPL" => "\n💡 Did you mean AAPL (Apple Inc.)?",
        "GOOG" => "\n💡 Try GOOGL (Alphabet Inc.)",
        "FB" => "\n💡 Try META (Meta Platforms Inc.)",
        _ => "\n💡 Try /search with a company name",
    }
}

/// Message shown when no card can be built
pub fn format_details_error(error: &DetailsError) -> String {
    match error {
        DetailsError::NotFound(symbol) => format!(
            "❌ No details available for \"{symbol}\"\nPlease check the symbol and try again.{}",
            symbol_suggestion(symbol)
        ),
    }
}

/// Format error messages for user display
pub fn format_stock_error(error: &ProviderError, symbol: &str) -> String {
    let upper_symbol = symbol.trim().to_uppercase();
    match error {
        ProviderError::NotFound(_) => format!(
            "❌ Stock symbol not found: \"{upper_symbol}\"\nPlease check the symbol and try again.{}",
            symbol_suggestion(&upper_symbol)
        ),
        ProviderError::ConfigAbsent(_) => {
            "⚙️ Market data is not configured\nPlease contact the administrator.".to_string()
        }
        ProviderError::Transport(_) => {
            "🌐 Network error\nPlease check your connection and try again.".to_string()
        }
        ProviderError::Parse(_) => {
            "🔧 Service temporarily unavailable\nPlease try again later.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(chart_data: Option<Vec<f64>>) -> StockDetails {
        StockDetails {
            id: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            quote: Quote::new("AAPL", 150.25, 2.35, 1.58),
            sarcastic_reason: "Analysts blame the moon.".to_string(),
            news_headline: "Apple posts quarterly profit".to_string(),
            mock_tweet: "To the moon. #AAPL".to_string(),
            latest_news: vec![NewsItem {
                url: "https://news.example/1".to_string(),
                ..NewsItem::new("Apple posts quarterly profit", "")
            }],
            chart_data,
        }
    }

    #[test]
    fn test_sparkline_spans_min_to_max() {
        let line = sparkline(&[100.0, 101.0, 98.0, 102.0, 99.0]).unwrap();
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars.len(), 5);
        assert_eq!(chars[2], '▁');
        assert_eq!(chars[3], '█');
    }

    #[test]
    fn test_sparkline_flat_series() {
        assert_eq!(sparkline(&[5.0, 5.0, 5.0]).unwrap(), "▅▅▅");
    }

    #[test]
    fn test_sparkline_rejects_degenerate_input() {
        assert!(sparkline(&[1.0]).is_none());
        assert!(sparkline(&[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn test_format_stock_card() {
        let card = format_stock_card(&details(Some(vec![1.0, 2.0])));

        assert!(card.contains("📈 AAPL · Apple Inc."));
        assert!(card.contains("$150.25 (+2.35, +1.58%)"));
        assert!(card.contains("▁█"));
        assert!(card.contains("🤔 Why it moved: Analysts blame the moon."));
        assert!(card.contains("https://news.example/1"));
    }

    #[test]
    fn test_format_stock_card_without_chart() {
        let card = format_stock_card(&details(None));
        assert!(!card.contains('▁'));
    }

    #[test]
    fn test_format_negative_quote() {
        let mut quote = Quote::new("MSFT", 380.10, -1.50, -0.39);
        quote.open = Some(381.0);

        let formatted = format_stock_quote(&quote);

        assert!(formatted.contains("📉 MSFT Stock Quote"));
        assert!(formatted.contains("-1.50"));
        assert!(formatted.contains("-0.39%"));
        assert!(formatted.contains("Open: $381.00"));
        assert!(!formatted.contains("High:"));
    }

    #[test]
    fn test_format_search_results() {
        let candidates = vec![
            SearchCandidate {
                symbol: "AAPL".to_string(),
                company_name: Some("Apple Inc".to_string()),
            },
            SearchCandidate {
                symbol: "APLE".to_string(),
                company_name: None,
            },
        ];

        let text = format_search_results("apple", &candidates);
        assert!(text.contains("Apple Inc (AAPL) → /snark AAPL"));
        assert!(text.contains("APLE → /snark APLE"));

        assert!(format_search_results("zzz", &[]).contains("No stocks found"));
    }

    #[test]
    fn test_format_trending() {
        let quotes = vec![
            Quote::new("GME", 14.37, -3.21, -18.26),
            Quote::new("MSFT", 415.32, 7.89, 1.87),
        ];

        let text = format_trending(&quotes);
        assert!(text.contains("1. GME -18.26% (-$3.21)"));
        assert!(text.contains("2. MSFT +1.87% (+$7.89)"));
    }

    #[test]
    fn test_format_trending_shows_company_name() {
        let mut quote = Quote::new("GME", 14.37, -3.21, -18.26);
        quote.company_name = Some("GameStop Corp.".to_string());

        let text = format_trending(&[quote]);
        assert!(text.contains("1. GME (GameStop Corp.) -18.26% (-$3.21)"));
    }

    #[test]
    fn test_format_error_messages() {
        let not_found = format_details_error(&DetailsError::NotFound("APPL".to_string()));
        assert!(not_found.contains("Did you mean AAPL"));

        let network = ProviderError::Transport("Connection failed".to_string());
        assert!(format_stock_error(&network, "AAPL").contains("🌐 Network error"));

        let missing = ProviderError::NotFound("INVALID".to_string());
        assert!(format_stock_error(&missing, "invalid").contains("\"INVALID\""));
    }
}
