use async_trait::async_trait;
use dividend_core::{DividendError, RateSource};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://free.currencyconverterapi.com/api/v5/convert";

/// Compact-mode value object: `{"EUR_SEK": {"val": 10.25}}`
#[derive(Debug, Deserialize)]
struct RateValue {
    val: f64,
}

/// Decode a compact converter response into pair-key -> rate.
pub fn parse_rate_body(body: &str) -> Result<HashMap<String, f64>, DividendError> {
    let decoded: HashMap<String, RateValue> =
        serde_json::from_str(body).map_err(|e| DividendError::ParseError(e.to_string()))?;

    Ok(decoded.into_iter().map(|(k, v)| (k, v.val)).collect())
}

/// Currency converter API client. One GET per pair, no retries.
#[derive(Clone)]
pub struct CurrencyClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl CurrencyClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: base_url.into(),
            api_key,
            client,
        }
    }

    fn query(&self, pair_key: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("q", pair_key.to_string()), ("compact", "y".to_string())];
        if let Some(key) = &self.api_key {
            query.push(("apiKey", key.clone()));
        }
        query
    }
}

#[async_trait]
impl RateSource for CurrencyClient {
    async fn fetch_pair(&self, pair_key: &str) -> Result<HashMap<String, f64>, DividendError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query(pair_key))
            .send()
            .await
            .map_err(|e| DividendError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DividendError::ApiError(format!(
                "HTTP {} for {}",
                response.status(),
                pair_key
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DividendError::ApiError(e.to_string()))?;

        let rates = parse_rate_body(&body)?;
        tracing::debug!("Fetched {} rate(s) for {}", rates.len(), pair_key);
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_body() {
        let rates = parse_rate_body(r#"{"EUR_SEK":{"val":10.256293}}"#).unwrap();
        assert_eq!(rates.get("EUR_SEK"), Some(&10.256293));
        assert_eq!(rates.len(), 1);
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let rates = parse_rate_body(r#"{"NOK_SEK":{"val":1.07,"id":"NOK_SEK"}}"#).unwrap();
        assert_eq!(rates.get("NOK_SEK"), Some(&1.07));
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(parse_rate_body("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_error_payload() {
        let err = parse_rate_body(r#"{"status":400,"error":"Invalid query"}"#).unwrap_err();
        assert!(matches!(err, DividendError::ParseError(_)));
    }

    #[test]
    fn test_query_includes_api_key_when_set() {
        let client = CurrencyClient::new(DEFAULT_BASE_URL, Some("secret".to_string()), Duration::from_secs(5));
        let query = client.query("DKK_SEK");
        assert!(query.contains(&("q", "DKK_SEK".to_string())));
        assert!(query.contains(&("compact", "y".to_string())));
        assert!(query.contains(&("apiKey", "secret".to_string())));

        let anonymous = CurrencyClient::new(DEFAULT_BASE_URL, None, Duration::from_secs(5));
        assert_eq!(anonymous.query("DKK_SEK").len(), 2);
    }

    #[tokio::test]
    #[ignore] // Needs network access to the converter API
    async fn test_fetch_live_pair() {
        let client = CurrencyClient::new(
            DEFAULT_BASE_URL,
            std::env::var("CURRENCY_API_KEY").ok(),
            Duration::from_secs(30),
        );
        let rates = client.fetch_pair("EUR_SEK").await.unwrap();
        assert!(rates.get("EUR_SEK").copied().unwrap_or_default() > 0.0);
    }
}
