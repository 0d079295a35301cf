use crate::{Candidate, CandidateRecord, PriceLookup};

/// Smallest native dividend amount a candidate may carry
pub const MIN_DIVIDEND: f64 = 1.0;

/// Attaches quoted prices and base-currency values to extracted records
pub struct Aggregator<'a> {
    prices: &'a PriceLookup,
}

impl<'a> Aggregator<'a> {
    pub fn new(prices: &'a PriceLookup) -> Self {
        Self { prices }
    }

    /// Finalize one record, or `None` if its dividend is below [`MIN_DIVIDEND`].
    pub fn finalize(&self, record: &CandidateRecord) -> Option<Candidate> {
        if record.dividend_amount < MIN_DIVIDEND {
            tracing::debug!(
                "{}: dividend {} {} below minimum, excluded",
                record.name,
                record.dividend_amount,
                record.dividend_currency
            );
            return None;
        }

        let quoted_price = self.prices.price_or_zero(&record.name);

        Some(Candidate {
            name: record.name.clone(),
            dividend_amount: record.dividend_amount,
            dividend_currency: record.dividend_currency.clone(),
            exchange_rate: record.exchange_rate,
            quoted_price,
            base_dividend: record.dividend_amount * record.exchange_rate,
            base_price: quoted_price * record.exchange_rate,
            score_contribution: record.score_contribution,
        })
    }

    pub fn aggregate<'r>(&self, records: impl IntoIterator<Item = &'r CandidateRecord>) -> Vec<Candidate> {
        records
            .into_iter()
            .filter_map(|record| self.finalize(record))
            .collect()
    }
}
