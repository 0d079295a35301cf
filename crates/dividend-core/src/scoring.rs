use crate::{Candidate, ScoredCandidate};

/// Additive ranking heuristic.
///
/// `score = separator-stripped native dividend digits + base-currency price`.
/// This is not a yield; a `12,50` dividend contributes `1250`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, candidate: &Candidate) -> f64 {
        candidate.score_contribution as f64 + candidate.base_price
    }

    pub fn score_all(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        candidates
            .into_iter()
            .map(|candidate| {
                let score = self.score(&candidate);
                ScoredCandidate { candidate, score }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn candidate(digits: u64, base_price: f64) -> Candidate {
        Candidate {
            name: "A".to_string(),
            dividend_amount: digits as f64 / 100.0,
            dividend_currency: "EUR".to_string(),
            exchange_rate: 10.0,
            quoted_price: base_price / 10.0,
            base_dividend: digits as f64 / 10.0,
            base_price,
            score_contribution: digits,
        }
    }

    #[test]
    fn test_score_adds_digits_and_base_price() {
        let engine = ScoreEngine::new();
        assert_relative_eq!(engine.score(&candidate(1250, 2000.0)), 3250.0);
    }

    #[test]
    fn test_score_without_price() {
        let engine = ScoreEngine::new();
        assert_relative_eq!(engine.score(&candidate(375, 0.0)), 375.0);
    }

    #[test]
    fn test_score_all_keeps_candidates() {
        let scored = ScoreEngine::new().score_all(vec![candidate(100, 1.0), candidate(200, 2.0)]);
        assert_eq!(scored.len(), 2);
        assert_relative_eq!(scored[0].score, 101.0);
        assert_relative_eq!(scored[1].score, 202.0);
    }
}
