use dividend_core::CalendarEntry;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".companyCalendarList .companyCalendarItem").expect("Failed to parse calendar item selector")
});
static NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".azaLink").expect("Failed to parse name selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("Failed to parse link selector"));
static LINE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("ul.companyCalendarItemList li").expect("Failed to parse sub-item selector")
});

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Resolve a page-relative href against the site root.
pub fn absolute_link(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}

/// Every calendar item on the page, in page order. Items without a name
/// are dropped.
pub fn parse_calendar(html: &str, base_url: &str) -> Vec<CalendarEntry> {
    let document = Html::parse_document(html);

    document
        .select(&ITEM_SELECTOR)
        .filter_map(|item| {
            let name = item
                .select(&NAME_SELECTOR)
                .next()
                .map(|el| element_text(el).trim().to_string())
                .filter(|n| !n.is_empty());
            let Some(name) = name else {
                tracing::debug!("Calendar item without a name, skipped");
                return None;
            };

            let href = item
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default();

            let lines = item.select(&LINE_SELECTOR).map(element_text).collect();

            Some(CalendarEntry::new(name, absolute_link(base_url, href), lines))
        })
        .collect()
}
