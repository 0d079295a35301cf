use dividend_core::QuoteText;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static BUY_PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".quoteBar .buyPrice").expect("Failed to parse quote selector"));

/// Raw buy-price text from a quote page, `None` when the page has no quote bar.
pub fn parse_quote(html: &str) -> QuoteText {
    let document = Html::parse_document(html);
    document
        .select(&BUY_PRICE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
