//! Built-in "disaster" cards.
//!
//! Served in place of live data when no quote provider is configured, so a
//! keyless deployment still has a trending board and a few cards to show.
//! Each entry carries hand-written satire and a multi-point chart.

use super::provider::Quote;
use super::service::StockDetails;

pub struct DemoStock {
    pub symbol: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub sarcastic_reason: &'static str,
    pub news_headline: &'static str,
    pub mock_tweet: &'static str,
    pub chart_data: &'static [f64],
}

pub const DEMO_STOCKS: &[DemoStock] = &[
    DemoStock {
        symbol: "AAPL",
        name: "Apple Inc.",
        price: 172.62,
        change: -5.48,
        change_percent: -3.08,
        sarcastic_reason: "Apparently, releasing the exact same phone with a slightly better \
            camera for the 12th year in a row isn't the innovation shareholders were hoping for. \
            Who knew?",
        news_headline: "Apple's iPhone 16 launch met with 'meh' from consumers and critics alike",
        mock_tweet: "Just spent $1,200 on a new iPhone and can't tell it apart from my old one. \
            Maybe the real innovation is Apple's ability to keep making me do this. #AppleFail",
        chart_data: &[180.0, 181.0, 179.0, 178.0, 176.0, 177.0, 175.0, 173.0, 172.62],
    },
    DemoStock {
        symbol: "NFLX",
        name: "Netflix Inc.",
        price: 408.73,
        change: -42.19,
        change_percent: -9.35,
        sarcastic_reason: "Turns out cancelling every show with a loyal fanbase and raising prices \
            during a cost-of-living crisis wasn't the brilliant strategy executives thought it \
            was. Shocking!",
        news_headline: "Netflix reports first subscriber loss in North America since 2011",
        mock_tweet: "Netflix just cancelled my favorite show and raised my subscription price in \
            the same week. It's like they're TRYING to make me pirate content again. \
            #NetflixExodus",
        chart_data: &[460.0, 455.0, 450.0, 445.0, 435.0, 425.0, 415.0, 410.0, 408.73],
    },
    DemoStock {
        symbol: "TSLA",
        name: "Tesla Inc.",
        price: 176.75,
        change: -18.32,
        change_percent: -9.39,
        sarcastic_reason: "Investors finally realized that a CEO who spends more time posting \
            memes than running his companies might not be the business genius they thought. \
            Who could've predicted this?",
        news_headline: "Tesla misses delivery targets as Musk focuses on social media acquisition",
        mock_tweet: "Bought a Tesla and now I wake up every morning worried about what its CEO \
            tweeted overnight and how much of my investment it just cost me. #ElonEffect",
        chart_data: &[195.0, 194.0, 190.0, 188.0, 185.0, 183.0, 180.0, 178.0, 176.75],
    },
    DemoStock {
        symbol: "META",
        name: "Meta Platforms Inc.",
        price: 324.16,
        change: -16.35,
        change_percent: -4.80,
        sarcastic_reason: "Turns out spending billions on a virtual world that looks like a 2008 \
            Wii game wasn't the future of technology. If only someone had warned them!",
        news_headline: "Meta's Reality Labs division posts $4.5B loss as Metaverse adoption lags",
        mock_tweet: "Zuckerberg spent $10 billion to make avatars without legs in a virtual world \
            nobody wants to visit. And I thought MY spending habits were bad. #MetaverseFlop",
        chart_data: &[345.0, 342.0, 340.0, 338.0, 335.0, 330.0, 328.0, 326.0, 324.16],
    },
    DemoStock {
        symbol: "GME",
        name: "GameStop Corp.",
        price: 14.37,
        change: -3.21,
        change_percent: -18.26,
        sarcastic_reason: "Turns out a brick-and-mortar store selling physical copies of games in \
            a digital download world wasn't actually saved by reddit memes. \
            Who would have thought?",
        news_headline: "GameStop reports 10th consecutive quarterly loss as 'meme stock' momentum \
            fades",
        mock_tweet: "Diamond hands turned to dust. Turns out HODLing a fundamentally broken \
            business model wasn't the get-rich-quick scheme Reddit promised. #GameStopLoss",
        chart_data: &[18.0, 17.5, 17.2, 16.8, 16.2, 15.7, 15.2, 14.8, 14.37],
    },
    DemoStock {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        price: 415.32,
        change: -7.89,
        change_percent: -1.87,
        sarcastic_reason: "Investors suddenly remembered that Windows updates still crash \
            computers after 35 years of development. Revolutionary!",
        news_headline: "Microsoft's new AI assistant accidentally insults CEO during demo",
        mock_tweet: "My Windows PC just spent 2 hours updating only to blue screen. Maybe \
            Microsoft should spend less on AI and more on actually working software. #WindowsFail",
        chart_data: &[425.0, 423.0, 420.0, 418.0, 417.0, 416.0, 414.0, 415.0, 415.32],
    },
    DemoStock {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        price: 172.98,
        change: -5.32,
        change_percent: -2.99,
        sarcastic_reason: "Turns out launching 17 messaging apps and killing every single one \
            wasn't a sustainable business strategy. Who knew?",
        news_headline: "Google shutters another product with millions of users, surprising \
            absolutely no one",
        mock_tweet: "Google just killed another product I relied on. At this point, getting \
            attached to Google products is like adopting pets from a serial killer. \
            #GoogleGraveyard",
        chart_data: &[180.0, 178.0, 177.0, 176.0, 175.0, 174.0, 173.0, 172.5, 172.98],
    },
];

/// Look up a built-in card, ignoring case
pub fn find(symbol: &str) -> Option<&'static DemoStock> {
    let symbol = symbol.trim();
    DEMO_STOCKS
        .iter()
        .find(|stock| stock.symbol.eq_ignore_ascii_case(symbol))
}

/// Known company name for a symbol, if it is one of the built-in cards
pub fn company_name(symbol: &str) -> Option<&'static str> {
    find(symbol).map(|stock| stock.name)
}

impl DemoStock {
    pub fn quote(&self) -> Quote {
        Quote {
            company_name: Some(self.name.to_string()),
            previous_close: Some(self.price - self.change),
            ..Quote::new(self.symbol, self.price, self.change, self.change_percent)
        }
    }

    pub fn details(&self) -> StockDetails {
        StockDetails {
            id: self.symbol.to_string(),
            name: self.name.to_string(),
            quote: self.quote(),
            sarcastic_reason: self.sarcastic_reason.to_string(),
            news_headline: self.news_headline.to_string(),
            mock_tweet: self.mock_tweet.to_string(),
            latest_news: Vec::new(),
            chart_data: Some(self.chart_data.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TRENDING_SYMBOLS;

    #[test]
    fn test_every_default_trending_symbol_has_a_card() {
        for symbol in DEFAULT_TRENDING_SYMBOLS {
            assert!(find(symbol).is_some(), "no built-in card for {symbol}");
        }
    }

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find(" gme ").map(|s| s.symbol), Some("GME"));
        assert!(find("ZZZZ").is_none());
        assert_eq!(company_name("meta"), Some("Meta Platforms Inc."));
    }

    #[test]
    fn test_chart_ends_at_the_quoted_price() {
        for stock in DEMO_STOCKS {
            assert!(stock.chart_data.len() >= 2);
            assert_eq!(stock.chart_data.last().copied(), Some(stock.price));
        }
    }

    #[test]
    fn test_details_are_complete() {
        let details = find("TSLA").unwrap().details();
        assert_eq!(details.id, "TSLA");
        assert_eq!(details.id, details.symbol());
        assert_eq!(details.name, "Tesla Inc.");
        assert_eq!(details.quote.company_name.as_deref(), Some("Tesla Inc."));
        assert_eq!(details.chart_data.as_ref().map(Vec::len), Some(9));
        assert!(details.news_headline.starts_with("Tesla misses"));
        assert!(details.latest_news.is_empty());
    }
}
