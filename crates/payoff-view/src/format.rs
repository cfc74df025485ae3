//! Number and date formatting shared by the renderers

use chrono::{DateTime, NaiveDate};

/// Group the digits of a non-negative integer string with commas
fn group(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn grouped(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `$1,234.56`, `-$379.50`
pub fn usd(value: f64) -> String {
    let text = grouped(value, 2);
    match text.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", text),
    }
}

/// Locale-style number: thousands separators, at most two decimals,
/// trailing zeros dropped (`54,800`, `3,125.5`)
pub fn thousands(value: f64) -> String {
    let text = grouped(value, 2);
    match text.split_once('.') {
        Some((int_part, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int_part.to_string()
            } else {
                format!("{}.{}", int_part, frac)
            }
        }
        None => text,
    }
}

/// `$54,800` style price label
pub fn usd_short(value: f64) -> String {
    let text = thousands(value);
    match text.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", text),
    }
}

/// Fixed decimals, or `N/A` when the value is missing
pub fn opt_fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

/// `Credit: $120.50` for negative cost, `Debit: $…` otherwise
pub fn cost_label(estimated_cost: f64) -> String {
    if estimated_cost < 0.0 {
        format!("Credit: {}", usd(estimated_cost.abs()))
    } else {
        format!("Debit: {}", usd(estimated_cost))
    }
}

/// Comma-separated breakevens to two decimals, `None` when empty
pub fn breakevens(points: &[f64]) -> String {
    if points.is_empty() {
        return "None".to_string();
    }
    points
        .iter()
        .map(|p| usd(*p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Mar 15, 2026`; unparseable input is returned unchanged
pub fn date(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
        return d.format("%b %-d, %Y").to_string();
    }
    timestamp.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd() {
        assert_eq!(usd(120.5), "$120.50");
        assert_eq!(usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(usd(-379.5), "-$379.50");
        assert_eq!(usd(-0.001), "$0.00");
        assert_eq!(usd(0.0), "$0.00");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(54_800.0), "54,800");
        assert_eq!(thousands(3_125.5), "3,125.5");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(usd_short(56_000.0), "$56,000");
    }

    #[test]
    fn test_cost_label() {
        assert_eq!(cost_label(-120.5), "Credit: $120.50");
        assert_eq!(cost_label(350.0), "Debit: $350.00");
    }

    #[test]
    fn test_breakevens() {
        assert_eq!(breakevens(&[49_000.0, 58_500.0]), "$49,000.00, $58,500.00");
        assert_eq!(breakevens(&[]), "None");
    }

    #[test]
    fn test_dates() {
        assert_eq!(date("2026-03-15T08:00:00Z"), "Mar 15, 2026");
        assert_eq!(date("2026-10-30"), "Oct 30, 2026");
        assert_eq!(date("next friday"), "next friday");
    }

    #[test]
    fn test_opt_fixed() {
        assert_eq!(opt_fixed(Some(0.000123), 4), "0.0001");
        assert_eq!(opt_fixed(None, 2), "N/A");
    }
}
