use std::collections::HashMap;

use crate::DividendError;

/// Quote text meaning "no price available"
pub const UNAVAILABLE_SENTINEL: &str = "-";

/// Parses quote text like `"1 234,50"`. `Ok(None)` for the unavailable
/// sentinel or an unrendered `\u` escape.
pub fn parse_quote_price(text: &str) -> Result<Option<f64>, DividendError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == UNAVAILABLE_SENTINEL || trimmed.contains("\\u") {
        return Ok(None);
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match normalized.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(Some(price)),
        Ok(_) => Err(DividendError::ParseError(format!("quote price {:?} is not a finite number", text))),
        Err(e) => Err(DividendError::ParseError(format!("quote price {:?}: {}", text, e))),
    }
}

/// Most recently observed quoted price per entity name
#[derive(Debug, Clone, Default)]
pub struct PriceLookup {
    prices: HashMap<String, f64>,
}

impl PriceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later observations for the same name replace earlier ones.
    pub fn record(&mut self, name: impl Into<String>, price: f64) {
        self.prices.insert(name.into(), price);
    }

    /// Parse and store raw quote text. Returns whether a price was stored.
    pub fn record_quote(&mut self, name: &str, text: Option<&str>) -> bool {
        let Some(text) = text else {
            tracing::debug!("{}: no quote on page", name);
            return false;
        };

        match parse_quote_price(text) {
            Ok(Some(price)) => {
                self.record(name, price);
                true
            }
            Ok(None) => {
                tracing::debug!("{}: quote not available", name);
                false
            }
            Err(e) => {
                tracing::warn!("{}: {}", name, e);
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.prices.get(name).copied()
    }

    /// Price for `name`, zero when none was observed
    pub fn price_or_zero(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
