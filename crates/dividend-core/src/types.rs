use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency every amount is normalized into.
pub const BASE_CURRENCY: &str = "SEK";

/// Number of candidates emitted by the final report.
pub const DEFAULT_REPORT_SIZE: usize = 5;

/// Rate-table key for a native currency against the base currency, e.g. `EUR_SEK`.
pub fn pair_key(code: &str) -> String {
    format!("{}_{}", code, BASE_CURRENCY)
}

/// One entry of the published dividend calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub name: String,
    /// Absolute address of the entity's quote page
    pub link: String,
    /// Free-text sub-item lines, in page order
    pub lines: Vec<String>,
}

impl CalendarEntry {
    pub fn new(name: impl Into<String>, link: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            lines,
        }
    }
}

/// Working record built while an entry's sub-items are scanned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    /// Detail page used to fetch the quoted price
    pub link: String,
    /// Compact `YYYYMMDD` form of the latest ex-dividend date seen
    pub ex_dividend_date: Option<u32>,
    /// Amount in the entity's native currency
    pub dividend_amount: f64,
    pub dividend_currency: String,
    pub exchange_rate: f64,
    /// Separator-stripped digits of every dividend amount seen, summed
    pub score_contribution: u64,
}

impl CandidateRecord {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            ..Default::default()
        }
    }
}

/// Candidate with price and rate attached. Immutable from here on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub dividend_amount: f64,
    pub dividend_currency: String,
    pub exchange_rate: f64,
    /// Native-currency quote; zero when no quote was found
    pub quoted_price: f64,
    pub base_dividend: f64,
    pub base_price: f64,
    pub score_contribution: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// One line of the final report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    pub name: String,
    pub base_price: f64,
    pub base_dividend: f64,
    /// Base-currency investment per unit of base-currency dividend.
    /// `None` when the base dividend is zero.
    pub investment_per_unit: Option<f64>,
    pub score: f64,
}

/// Where the rates of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateOrigin {
    Live,
    Fallback,
}

/// Pair-key to exchange-rate mapping, built fresh per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    origin: RateOrigin,
}

impl RateTable {
    pub fn live() -> Self {
        Self {
            rates: HashMap::new(),
            origin: RateOrigin::Live,
        }
    }

    pub fn fallback(rates: HashMap<String, f64>) -> Self {
        Self {
            rates,
            origin: RateOrigin::Fallback,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, rate: f64) {
        self.rates.insert(key.into(), rate);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.rates.get(key).copied()
    }

    /// Rate converting `code` into the base currency. The base currency
    /// itself is always `1.0`.
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        if code == BASE_CURRENCY {
            return Some(1.0);
        }
        self.get(&pair_key(code))
    }

    pub fn origin(&self) -> RateOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub reference_date: NaiveDate,
    pub rate_origin: RateOrigin,
    pub entries_seen: usize,
    pub eligible: usize,
    pub priced: usize,
    pub lines: Vec<ReportLine>,
}
