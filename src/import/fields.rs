//! Defensive coercions for untyped text coming from storage or imports.
//!
//! None of these functions fail: unusable input degrades to a safe default.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;

use crate::domain::Frequency;

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '¢'];
const TRUTHY: &[&str] = &["true", "yes", "1", "y"];

static MONTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    [
        ("jan", 1),
        ("january", 1),
        ("feb", 2),
        ("february", 2),
        ("mar", 3),
        ("march", 3),
        ("apr", 4),
        ("april", 4),
        ("may", 5),
        ("jun", 6),
        ("june", 6),
        ("jul", 7),
        ("july", 7),
        ("aug", 8),
        ("august", 8),
        ("sep", 9),
        ("september", 9),
        ("oct", 10),
        ("october", 10),
        ("nov", 11),
        ("november", 11),
        ("dec", 12),
        ("december", 12),
    ]
    .into_iter()
    .collect()
});

const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a monetary amount, ignoring currency symbols, thousands separators
/// and whitespace. Returns 0 for anything that does not start with a number.
pub fn parse_amount(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',' && !CURRENCY_SYMBOLS.contains(ch))
        .collect();
    leading_number(&cleaned)
        .and_then(|number| number.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix that reads as a decimal number (sign, digits, fraction, exponent).
fn leading_number(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    Some(&text[..end])
}

/// Parses a calendar date from loosely formatted text, falling back to `today`.
///
/// Month-and-day inputs without a year ("Jan 8", "1/8") are placed in `today`'s year.
pub fn parse_date(input: &str, today: NaiveDate) -> NaiveDate {
    try_parse_date(input, today).unwrap_or(today)
}

/// Like [`parse_date`] but reports unusable input as `None` instead of substituting `today`.
///
/// `today` only supplies the year for month-and-day inputs.
pub fn try_parse_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }
    if is_iso_shape(text) {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
    }
    parse_month_day(text, today.year()).or_else(|| parse_generic(text, today))
}

fn is_iso_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

fn parse_month_day(text: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let month_name = parts.next()?;
    let day_text = parts.next()?;
    if parts.next().is_some()
        || !month_name.chars().all(|ch| ch.is_ascii_alphabetic())
        || day_text.is_empty()
        || day_text.len() > 2
        || !day_text.chars().all(|ch| ch.is_ascii_digit())
    {
        return None;
    }
    let month = *MONTHS.get(month_name.to_ascii_lowercase().as_str())?;
    let day: i64 = day_text.parse().ok()?;
    // Out-of-range days roll over into the neighbouring month.
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(day - 1))
}

fn parse_generic(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }
    if let Some(date) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(date.date());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date);
    }
    let with_year = format!("{}/{}", text, today.year());
    NaiveDate::parse_from_str(&with_year, "%m/%d/%Y").ok()
}

/// Maps free-text cadence descriptions onto a [`Frequency`], defaulting to monthly.
pub fn parse_frequency(input: &str) -> Frequency {
    let normalized = input.trim().to_lowercase();
    if normalized.contains("week") && !normalized.contains("bi") {
        return Frequency::Weekly;
    }
    if normalized.contains("biweek")
        || normalized.contains("bi-week")
        || normalized.contains("every 2 week")
    {
        return Frequency::Biweekly;
    }
    Frequency::Monthly
}

pub fn parse_boolean(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    TRUTHY.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    #[test]
    fn amount_strips_symbols_and_separators() {
        assert_eq!(parse_amount("$1,234.56"), 1234.56);
        assert_eq!(parse_amount(" € 1 200 "), 1200.0);
        assert_eq!(parse_amount("-$5.25"), -5.25);
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount(".5"), 0.5);
    }

    #[test]
    fn amount_defaults_to_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn date_accepts_iso_and_month_names() {
        assert_eq!(parse_date("2024-01-01", today()), date(2024, 1, 1));
        assert_eq!(parse_date("Jan 8", today()), date(2025, 1, 8));
        assert_eq!(parse_date("SEPTEMBER 3", today()), date(2025, 9, 3));
        assert_eq!(parse_date("feb 30", today()), date(2025, 3, 2));
    }

    #[test]
    fn date_tries_generic_formats() {
        assert_eq!(parse_date("03/04/2024", today()), date(2024, 3, 4));
        assert_eq!(parse_date("1/8", today()), date(2025, 1, 8));
        assert_eq!(parse_date("March 4, 2024", today()), date(2024, 3, 4));
        assert_eq!(
            parse_date("2024-05-01T12:30:00Z", today()),
            date(2024, 5, 1)
        );
    }

    #[test]
    fn date_falls_back_to_today() {
        assert_eq!(parse_date("", today()), today());
        assert_eq!(parse_date("whenever", today()), today());
        assert_eq!(parse_date("2024-02-30", today()), today());
        assert_eq!(parse_date("Smarch 4", today()), today());
    }

    #[test]
    fn strict_date_reports_unusable_input() {
        assert_eq!(try_parse_date("Jan 8", today()), Some(date(2025, 1, 8)));
        assert_eq!(try_parse_date("2024-02-30", today()), None);
        assert_eq!(try_parse_date("whenever", today()), None);
        assert_eq!(try_parse_date("  ", today()), None);
    }

    #[test]
    fn frequency_rules_apply_in_order() {
        assert_eq!(parse_frequency("Weekly"), Frequency::Weekly);
        assert_eq!(parse_frequency("bi-weekly"), Frequency::Biweekly);
        assert_eq!(parse_frequency("BIWEEKLY"), Frequency::Biweekly);
        assert_eq!(parse_frequency("every 2 weeks"), Frequency::Weekly);
        assert_eq!(parse_frequency("Monthly"), Frequency::Monthly);
        assert_eq!(parse_frequency("yearly"), Frequency::Monthly);
        assert_eq!(parse_frequency(""), Frequency::Monthly);
    }

    #[test]
    fn boolean_accepts_common_truthy_words() {
        for value in ["true", "YES", " 1 ", "y"] {
            assert!(parse_boolean(value), "{value} should be true");
        }
        for value in ["", "no", "false", "0", "essential"] {
            assert!(!parse_boolean(value), "{value} should be false");
        }
    }
}
