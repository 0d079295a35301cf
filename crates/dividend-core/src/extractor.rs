//! Record extraction
//!
//! Turns the free-text sub-items of one calendar entry into a
//! [`CandidateRecord`] and applies the ex-dividend date filter.

use chrono::{Datelike, NaiveDate};

use crate::{CalendarEntry, CandidateRecord, RateTable};

/// Sub-item marker for "trades without dividend starting on this date"
pub const EX_DATE_MARKER: &str = "Handlas utan utdelning";
/// Sub-item marker for the ordinary dividend amount
pub const DIVIDEND_MARKER: &str = "Ordinarie utdelning";

/// Amount and currency read from a dividend line such as `12,50 EUR`
#[derive(Debug, Clone, PartialEq)]
pub struct DividendToken {
    /// Native amount with the decimal comma read as a point
    pub amount: f64,
    pub currency: String,
    /// The amount's digits with the separator removed (`12,50` -> `1250`)
    pub digits: Option<u64>,
}

/// Result of extracting one calendar entry
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Eligible(CandidateRecord),
    /// Latest ex-dividend date is today or earlier
    Expired { ex_date: u32 },
    /// No `YYYY-MM-DD` token on any ex-date line
    MissingDate,
    /// A dividend line carried no `<digits>,<digits> <CODE>` token
    MissingDividend,
}

/// Digits-only form of a date: `2024-03-15` -> `20240315`.
pub fn compact_date(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Finds the first `DDDD-DD-DD` token in `line` and returns it in compact
/// integer form.
pub fn parse_ex_date(line: &str) -> Option<u32> {
    let bytes = line.as_bytes();
    if bytes.len() < 10 {
        return None;
    }

    (0..=bytes.len() - 10).find_map(|i| {
        let window = &bytes[i..i + 10];
        let shape_ok = window.iter().enumerate().all(|(pos, b)| match pos {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if !shape_ok {
            return None;
        }
        window
            .iter()
            .filter(|b| b.is_ascii_digit())
            .try_fold(0u32, |acc, b| Some(acc * 10 + u32::from(b - b'0')))
    })
}

/// Finds the first `<digits>,<digits> <UPPERCASE>` token in `line`.
pub fn parse_dividend(line: &str) -> Option<DividendToken> {
    let bytes = line.as_bytes();

    for start in 0..bytes.len() {
        let whole_len = digit_run(bytes, start);
        if whole_len == 0 {
            continue;
        }
        let comma = start + whole_len;
        if bytes.get(comma) != Some(&b',') {
            continue;
        }
        let frac_len = digit_run(bytes, comma + 1);
        if frac_len == 0 {
            continue;
        }
        let space = comma + 1 + frac_len;
        if bytes.get(space) != Some(&b' ') {
            continue;
        }
        let code_len = bytes[space + 1..]
            .iter()
            .take_while(|b| b.is_ascii_uppercase())
            .count();
        if code_len == 0 {
            continue;
        }

        let whole = &line[start..comma];
        let frac = &line[comma + 1..space];
        let currency = &line[space + 1..space + 1 + code_len];

        let amount = format!("{}.{}", whole, frac).parse::<f64>().ok()?;
        let digits = format!("{}{}", whole, frac).parse::<u64>().ok();

        return Some(DividendToken {
            amount,
            currency: currency.to_string(),
            digits,
        });
    }

    None
}

/// Extracts candidate records relative to a reference "today"
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    today: u32,
}

impl RecordExtractor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: compact_date(today),
        }
    }

    /// Scan one entry's sub-items. Exchange rates are resolved against
    /// `rates`; a currency with no pair key gets a zero rate.
    pub fn extract(&self, entry: &CalendarEntry, rates: &RateTable) -> Extraction {
        let mut record = CandidateRecord::new(entry.name.clone(), entry.link.clone());

        for line in &entry.lines {
            if line.contains(EX_DATE_MARKER) {
                match parse_ex_date(line) {
                    Some(date) => {
                        record.ex_dividend_date =
                            Some(record.ex_dividend_date.map_or(date, |d| d.max(date)));
                    }
                    None => {
                        tracing::debug!("{}: no date on ex-dividend line {:?}", entry.name, line);
                    }
                }
            }

            if line.contains(DIVIDEND_MARKER) {
                let Some(token) = parse_dividend(line) else {
                    tracing::debug!("{}: no amount on dividend line {:?}, skipping", entry.name, line);
                    return Extraction::MissingDividend;
                };

                match token.digits {
                    Some(digits) => {
                        record.score_contribution = record.score_contribution.saturating_add(digits);
                        record.dividend_amount = token.amount;
                    }
                    None => {
                        tracing::warn!(
                            "{}: dividend amount {} {} is out of range, treating as zero",
                            entry.name,
                            token.amount,
                            token.currency
                        );
                        record.dividend_amount = 0.0;
                    }
                }
                record.exchange_rate = rates.rate_for(&token.currency).unwrap_or_else(|| {
                    tracing::warn!("{}: no exchange rate for {}", entry.name, token.currency);
                    0.0
                });
                record.dividend_currency = token.currency;
            }
        }

        match record.ex_dividend_date {
            None => Extraction::MissingDate,
            Some(date) if date <= self.today => Extraction::Expired { ex_date: date },
            Some(_) => Extraction::Eligible(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn rates() -> RateTable {
        let mut table = RateTable::live();
        table.insert("EUR_SEK", 10.0);
        table
    }

    fn entry(lines: &[&str]) -> CalendarEntry {
        CalendarEntry::new(
            "Acme AB",
            "https://example.test/acme",
            lines.iter().map(|l| l.to_string()).collect(),
        )
    }

    #[test]
    fn test_compact_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(compact_date(date), 20240315);
    }

    #[test]
    fn test_parse_ex_date_finds_token_in_text() {
        assert_eq!(parse_ex_date("Handlas utan utdelning: 2024-03-15"), Some(20240315));
        assert_eq!(parse_ex_date("Handlas utan utdelning\n 2024-03-15 och 2024-04-01"), Some(20240315));
    }

    #[test]
    fn test_parse_ex_date_miss() {
        assert_eq!(parse_ex_date("Handlas utan utdelning: snart"), None);
        assert_eq!(parse_ex_date("2024-3-15"), None);
        assert_eq!(parse_ex_date(""), None);
    }

    #[test]
    fn test_parse_dividend_decimal_comma() {
        let token = parse_dividend("Ordinarie utdelning:\n 3,75 SEK").unwrap();
        assert_relative_eq!(token.amount, 3.75);
        assert_eq!(token.currency, "SEK");
        assert_eq!(token.digits, Some(375));
    }

    #[test]
    fn test_parse_dividend_keeps_trailing_zero_digits() {
        let token = parse_dividend("12,50 EUR").unwrap();
        assert_relative_eq!(token.amount, 12.5);
        assert_eq!(token.digits, Some(1250));
    }

    #[test]
    fn test_parse_dividend_skips_non_matching_prefix() {
        let token = parse_dividend("Ordinarie utdelning 2024: 1,5 x, 0,80 NOK").unwrap();
        assert_relative_eq!(token.amount, 0.8);
        assert_eq!(token.currency, "NOK");
        assert_eq!(token.digits, Some(80));
    }

    #[test]
    fn test_parse_dividend_miss() {
        assert!(parse_dividend("Ordinarie utdelning: 5 SEK").is_none());
        assert!(parse_dividend("Ordinarie utdelning: 5,00 sek").is_none());
        assert!(parse_dividend("Ordinarie utdelning: 5,00SEK").is_none());
    }

    #[test]
    fn test_parse_dividend_digits_overflow() {
        let token = parse_dividend("99999999999999999999,99 SEK").unwrap();
        assert_eq!(token.digits, None);
    }

    #[test]
    fn test_out_of_range_dividend_becomes_zero() {
        let extractor = RecordExtractor::new(today());
        let Extraction::Eligible(record) = extractor.extract(
            &entry(&["Handlas utan utdelning: 2024-05-02", "Ordinarie utdelning: 99999999999999999999,99 SEK"]),
            &rates(),
        ) else {
            panic!("expected eligible record");
        };
        assert_relative_eq!(record.dividend_amount, 0.0);
        assert_eq!(record.score_contribution, 0);
        assert_eq!(record.dividend_currency, "SEK");
    }

    #[test]
    fn test_future_ex_date_is_eligible() {
        let extractor = RecordExtractor::new(today());
        let result = extractor.extract(
            &entry(&["Handlas utan utdelning: 2024-03-11", "Ordinarie utdelning: 12,50 EUR"]),
            &rates(),
        );

        let Extraction::Eligible(record) = result else {
            panic!("expected eligible record, got {:?}", result);
        };
        assert_eq!(record.name, "Acme AB");
        assert_eq!(record.ex_dividend_date, Some(20240311));
        assert_relative_eq!(record.dividend_amount, 12.5);
        assert_eq!(record.dividend_currency, "EUR");
        assert_relative_eq!(record.exchange_rate, 10.0);
        assert_eq!(record.score_contribution, 1250);
    }

    #[test]
    fn test_ex_date_today_is_excluded() {
        let extractor = RecordExtractor::new(today());
        let result = extractor.extract(
            &entry(&["Handlas utan utdelning: 2024-03-10", "Ordinarie utdelning: 12,50 EUR"]),
            &rates(),
        );
        assert_eq!(result, Extraction::Expired { ex_date: 20240310 });
    }

    #[test]
    fn test_past_ex_date_is_excluded() {
        let extractor = RecordExtractor::new(today());
        let result = extractor.extract(
            &entry(&["Handlas utan utdelning: 2023-12-01", "Ordinarie utdelning: 99,00 SEK"]),
            &rates(),
        );
        assert_eq!(result, Extraction::Expired { ex_date: 20231201 });
    }

    #[test]
    fn test_missing_date_is_skipped() {
        let extractor = RecordExtractor::new(today());
        let result = extractor.extract(
            &entry(&["Handlas utan utdelning: okänt", "Ordinarie utdelning: 2,00 SEK"]),
            &rates(),
        );
        assert_eq!(result, Extraction::MissingDate);
    }

    #[test]
    fn test_unparseable_dividend_line_skips_entry() {
        let extractor = RecordExtractor::new(today());
        let result = extractor.extract(
            &entry(&["Handlas utan utdelning: 2024-04-01", "Ordinarie utdelning: se bolagets hemsida"]),
            &rates(),
        );
        assert_eq!(result, Extraction::MissingDividend);
    }

    #[test]
    fn test_base_currency_rate_is_one() {
        let extractor = RecordExtractor::new(today());
        let Extraction::Eligible(record) = extractor.extract(
            &entry(&["Ordinarie utdelning: 4,20 SEK", "Handlas utan utdelning: 2024-05-02"]),
            &RateTable::live(),
        ) else {
            panic!("expected eligible record");
        };
        assert_relative_eq!(record.exchange_rate, 1.0);
    }

    #[test]
    fn test_unknown_currency_gets_zero_rate() {
        let extractor = RecordExtractor::new(today());
        let Extraction::Eligible(record) = extractor.extract(
            &entry(&["Handlas utan utdelning: 2024-05-02", "Ordinarie utdelning: 1,10 USD"]),
            &rates(),
        ) else {
            panic!("expected eligible record");
        };
        assert_relative_eq!(record.exchange_rate, 0.0);
        assert_eq!(record.dividend_currency, "USD");
    }

    #[test]
    fn test_repeated_dividend_lines_accumulate_score() {
        let extractor = RecordExtractor::new(today());
        let Extraction::Eligible(record) = extractor.extract(
            &entry(&[
                "Ordinarie utdelning: 1,50 SEK",
                "Ordinarie utdelning: 2,25 SEK",
                "Handlas utan utdelning: 2024-05-02",
            ]),
            &rates(),
        ) else {
            panic!("expected eligible record");
        };
        assert_eq!(record.score_contribution, 150 + 225);
        assert_relative_eq!(record.dividend_amount, 2.25);
    }

    #[test]
    fn test_any_future_date_line_makes_entry_eligible() {
        let extractor = RecordExtractor::new(today());
        let Extraction::Eligible(record) = extractor.extract(
            &entry(&[
                "Handlas utan utdelning: 2024-01-02",
                "Handlas utan utdelning: 2024-06-20",
                "Ordinarie utdelning: 3,00 SEK",
            ]),
            &rates(),
        ) else {
            panic!("expected eligible record");
        };
        assert_eq!(record.ex_dividend_date, Some(20240620));
    }

    #[test]
    fn test_entry_without_dividend_line_has_zero_amount() {
        let extractor = RecordExtractor::new(today());
        let Extraction::Eligible(record) =
            extractor.extract(&entry(&["Handlas utan utdelning: 2024-05-02"]), &rates())
        else {
            panic!("expected eligible record");
        };
        assert_relative_eq!(record.dividend_amount, 0.0);
        assert_eq!(record.score_contribution, 0);
    }
}
