//! HTML collaborators for the dividend calendar and per-entity quote pages.

pub mod calendar;
pub mod quote;

use async_trait::async_trait;
use dividend_core::{CalendarEntry, CalendarSource, DividendError, QuoteSource, QuoteText};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.avanza.se";
pub const DEFAULT_CALENDAR_PATH: &str = "/placera/foretagskalendern/utdelningar.html";

#[derive(Clone)]
pub struct CalendarScraper {
    base_url: String,
    calendar_path: String,
    client: Client,
}

impl CalendarScraper {
    pub fn new(base_url: impl Into<String>, calendar_path: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dividend-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into(),
            calendar_path: calendar_path.into(),
            client,
        }
    }

    async fn get_html(&self, url: &str) -> Result<String, DividendError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DividendError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DividendError::ApiError(format!("HTTP {}: {}", response.status(), url)));
        }

        response
            .text()
            .await
            .map_err(|e| DividendError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl CalendarSource for CalendarScraper {
    async fn fetch_calendar(&self) -> Result<Vec<CalendarEntry>, DividendError> {
        let url = format!("{}{}", self.base_url, self.calendar_path);
        tracing::debug!("Fetching dividend calendar {}", url);
        let html = self.get_html(&url).await?;
        Ok(calendar::parse_calendar(&html, &self.base_url))
    }
}

#[async_trait]
impl QuoteSource for CalendarScraper {
    async fn fetch_quote(&self, link: &str) -> Result<QuoteText, DividendError> {
        tracing::debug!("Fetching quote page {}", link);
        let html = self.get_html(link).await?;
        Ok(quote::parse_quote(&html))
    }
}
