use dividend_core::{RateOrigin, ScanReport, BASE_CURRENCY};
use std::fmt::Write;

/// Plain-text report, one block per candidate.
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();

    if report.lines.is_empty() {
        let _ = writeln!(out, "No dividend candidates found for {}", report.reference_date);
        return out;
    }

    for line in &report.lines {
        let ratio = line
            .investment_per_unit
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "undefined".to_string());

        let _ = writeln!(out, "Name:\t\t\t\t{}", line.name);
        let _ = writeln!(out, "Price ({}):\t\t\t{:.2}", BASE_CURRENCY, line.base_price);
        let _ = writeln!(out, "Dividend ({}):\t\t\t{:.2}", BASE_CURRENCY, line.base_dividend);
        let _ = writeln!(out, "Investment per {} dividend:\t{}", BASE_CURRENCY, ratio);
        out.push('\n');
    }

    if report.rate_origin == RateOrigin::Fallback {
        let _ = writeln!(out, "Note: live exchange rates unavailable, default rates used");
    }
    out
}
