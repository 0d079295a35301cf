//! Exchange-rate resolution with an all-or-nothing fallback.

use std::collections::HashMap;

use crate::{pair_key, RateSource, RateTable};

/// Currencies looked up by default, base currency excluded
pub const DEFAULT_TRACKED_CURRENCIES: &[&str] = &["NOK", "DKK", "EUR"];

/// Hardcoded table used whenever any live lookup fails
pub fn default_rate_table() -> RateTable {
    let rates: HashMap<String, f64> = [
        ("NOK_SEK", 1.07517),
        ("EUR_SEK", 10.256293),
        ("DKK_SEK", 1.376561),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    RateTable::fallback(rates)
}

pub struct RateResolver<'a> {
    source: &'a dyn RateSource,
}

impl<'a> RateResolver<'a> {
    pub fn new(source: &'a dyn RateSource) -> Self {
        Self { source }
    }

    /// Look up every code in order. The first failed lookup discards all
    /// rates gathered so far and returns the default table.
    pub async fn resolve(&self, currencies: &[String]) -> RateTable {
        let mut table = RateTable::live();

        for code in currencies {
            let key = pair_key(code);
            match self.source.fetch_pair(&key).await {
                Ok(rates) => {
                    for (pair, rate) in rates {
                        tracing::debug!("Rate {} = {}", pair, rate);
                        table.insert(pair, rate);
                    }
                }
                Err(e) => {
                    tracing::warn!("Rate lookup for {} failed ({}), using default rate table", key, e);
                    return default_rate_table();
                }
            }
        }

        tracing::info!("Resolved {} live exchange rates", table.len());
        table
    }
}
