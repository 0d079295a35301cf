//! Two-phase scan: extract every calendar entry first, then fetch quotes
//! for the eligible candidates only.

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;

use crate::extractor::{Extraction, RecordExtractor};
use crate::rates::DEFAULT_TRACKED_CURRENCIES;
use crate::{
    Aggregator, CalendarEntry, CalendarSource, CandidateRecord, DividendError, PriceLookup, QuoteSource,
    RankSelector, RateResolver, RateSource, RateTable, ScanReport, ScoreEngine, DEFAULT_REPORT_SIZE,
};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Currencies to resolve against the base currency
    pub currencies: Vec<String>,
    /// Quote pages fetched at once; 1 keeps fetches strictly sequential
    pub quote_concurrency: usize,
    pub report_size: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            currencies: DEFAULT_TRACKED_CURRENCIES.iter().map(|s| s.to_string()).collect(),
            quote_concurrency: 1,
            report_size: DEFAULT_REPORT_SIZE,
        }
    }
}

/// State owned by one run: the candidate set and the price store.
#[derive(Debug, Default)]
pub struct PipelineContext {
    candidates: HashMap<String, CandidateRecord>,
    prices: PriceLookup,
    entries_seen: usize,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the extractor over one entry. Eligible records replace any
    /// earlier record with the same name.
    pub fn ingest(&mut self, extractor: &RecordExtractor, entry: &CalendarEntry, rates: &RateTable) {
        self.entries_seen += 1;
        match extractor.extract(entry, rates) {
            Extraction::Eligible(record) => {
                if self.candidates.contains_key(&record.name) {
                    tracing::debug!("{}: duplicate calendar entry replaces earlier one", record.name);
                }
                self.candidates.insert(record.name.clone(), record);
            }
            Extraction::Expired { ex_date } => {
                tracing::debug!("{}: ex-dividend date {} has passed", entry.name, ex_date);
            }
            Extraction::MissingDate => {
                tracing::debug!("{}: no ex-dividend date, skipped", entry.name);
            }
            Extraction::MissingDividend => {
                tracing::debug!("{}: unreadable dividend, skipped", entry.name);
            }
        }
    }

    /// `(name, link)` of every eligible candidate, ordered by name
    pub fn quote_targets(&self) -> Vec<(String, String)> {
        let mut targets: Vec<_> = self
            .candidates
            .values()
            .map(|r| (r.name.clone(), r.link.clone()))
            .collect();
        targets.sort();
        targets
    }

    pub fn candidates(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.candidates.values()
    }

    pub fn candidate(&self, name: &str) -> Option<&CandidateRecord> {
        self.candidates.get(name)
    }

    pub fn prices(&self) -> &PriceLookup {
        &self.prices
    }

    pub fn prices_mut(&mut self) -> &mut PriceLookup {
        &mut self.prices
    }

    pub fn entries_seen(&self) -> usize {
        self.entries_seen
    }

    pub fn eligible(&self) -> usize {
        self.candidates.len()
    }
}

pub struct DividendPipeline<'a> {
    rates: &'a dyn RateSource,
    calendar: &'a dyn CalendarSource,
    quotes: &'a dyn QuoteSource,
    settings: PipelineSettings,
}

impl<'a> DividendPipeline<'a> {
    pub fn new(
        rates: &'a dyn RateSource,
        calendar: &'a dyn CalendarSource,
        quotes: &'a dyn QuoteSource,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            rates,
            calendar,
            quotes,
            settings,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> Result<ScanReport, DividendError> {
        let rate_table = RateResolver::new(self.rates).resolve(&self.settings.currencies).await;

        let entries = self.calendar.fetch_calendar().await?;
        tracing::info!("Calendar returned {} entries", entries.len());

        let extractor = RecordExtractor::new(today);
        let mut ctx = PipelineContext::new();
        for entry in &entries {
            ctx.ingest(&extractor, entry, &rate_table);
        }
        tracing::info!("{} of {} entries are eligible", ctx.eligible(), ctx.entries_seen());

        self.fetch_quotes(&mut ctx).await;

        let candidates = Aggregator::new(ctx.prices()).aggregate(ctx.candidates());
        let scored = ScoreEngine::new().score_all(candidates);
        let lines = RankSelector::new(self.settings.report_size).report(scored);

        Ok(ScanReport {
            reference_date: today,
            rate_origin: rate_table.origin(),
            entries_seen: ctx.entries_seen(),
            eligible: ctx.eligible(),
            priced: ctx.prices().len(),
            lines,
        })
    }

    /// Fetch one quote page per eligible candidate. Failures leave the
    /// price unset; nothing is retried.
    async fn fetch_quotes(&self, ctx: &mut PipelineContext) {
        let quotes = self.quotes;
        let results: Vec<_> = stream::iter(ctx.quote_targets().into_iter().map(|(name, link)| async move {
            let result = quotes.fetch_quote(&link).await;
            (name, result)
        }))
        .buffered(self.settings.quote_concurrency.max(1))
        .collect()
        .await;

        for (name, result) in results {
            match result {
                Ok(text) => {
                    ctx.prices_mut().record_quote(&name, text.as_deref());
                }
                Err(e) => tracing::warn!("{}: quote fetch failed: {}", name, e),
            }
        }
        tracing::info!("Priced {} of {} candidates", ctx.prices().len(), ctx.eligible());
    }
}
