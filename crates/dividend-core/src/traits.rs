use async_trait::async_trait;
use std::collections::HashMap;

use crate::{CalendarEntry, DividendError};

/// Raw quoted-price text as shown on a quote page. `None` when the page
/// carries no quote element at all.
pub type QuoteText = Option<String>;

/// Trait for exchange-rate lookups
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Look up one `<CODE>_<BASE>` pair. Any error counts as a failed lookup.
    async fn fetch_pair(&self, pair_key: &str) -> Result<HashMap<String, f64>, DividendError>;
}

/// Trait for the published dividend calendar
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch_calendar(&self) -> Result<Vec<CalendarEntry>, DividendError>;
}

/// Trait for per-entity quote pages
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quote(&self, link: &str) -> Result<QuoteText, DividendError>;
}
