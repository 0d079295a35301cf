use crate::{ReportLine, ScoredCandidate, DEFAULT_REPORT_SIZE};

/// Orders scored candidates and keeps the best `limit`
#[derive(Debug, Clone)]
pub struct RankSelector {
    limit: usize,
}

impl Default for RankSelector {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_SIZE)
    }
}

impl RankSelector {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Sort by score descending, ties by name ascending, then truncate.
    pub fn select(&self, mut scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.candidate.name.cmp(&b.candidate.name))
        });
        scored.truncate(self.limit);
        scored
    }

    pub fn report(&self, scored: Vec<ScoredCandidate>) -> Vec<ReportLine> {
        self.select(scored).into_iter().map(report_line).collect()
    }
}

/// Investment needed per unit of dividend, both in base currency
pub fn investment_per_unit(base_price: f64, base_dividend: f64) -> Option<f64> {
    if base_dividend == 0.0 {
        return None;
    }
    Some(base_price / base_dividend)
}

fn report_line(scored: ScoredCandidate) -> ReportLine {
    let c = scored.candidate;
    ReportLine {
        investment_per_unit: investment_per_unit(c.base_price, c.base_dividend),
        name: c.name,
        base_price: c.base_price,
        base_dividend: c.base_dividend,
        score: scored.score,
    }
}
