use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)(st|nd|rd|th)\b").unwrap());
static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+to\s+|[-–]").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
static DAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2})\b").unwrap());

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Default, Clone, Copy)]
struct PartialDate {
    month: Option<u32>,
    day: Option<u32>,
    year: Option<i32>,
}

fn strip_ordinals(s: &str) -> String {
    ORDINAL_RE.replace_all(s, "$1").to_string()
}

fn parse_partial(s: &str) -> PartialDate {
    let cleaned = strip_ordinals(s);
    let year = YEAR_RE
        .captures(&cleaned)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let without_year = match year {
        Some(_) => YEAR_RE.replace(&cleaned, "").to_string(),
        None => cleaned.clone(),
    };

    let lower = without_year.to_lowercase();
    let month = MONTHS
        .iter()
        .position(|name| lower.contains(name))
        .map(|i| (i + 1) as u32);

    let day = DAY_RE
        .find(&without_year)
        .and_then(|m| m.as_str().parse::<u32>().ok());

    PartialDate { month, day, year }
}

fn to_utc(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| {
        d.and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc()
    })
}

/// Parses a free-form date range such as `"Jan 12 - 14, 2024"`,
/// `"15 Jan - 20 Feb 2024"`, or `"Dec 17, 2025 - Feb 09, 2026"` (step 4).
/// Unparseable sides become `None` rather than failing the whole record.
pub fn parse_date_range(text: &str) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let mut parts = SPLIT_RE.splitn(text, 2);
    let left_raw = parts.next().unwrap_or_default();
    let right_raw = match parts.next() {
        Some(r) => r,
        None => return (parse_single_date(text), None),
    };

    let left = parse_partial(left_raw);
    let mut right = parse_partial(right_raw);

    // The right side frequently omits the month ("Jan 12 - 14, 2024") —
    // inherit it from the left when that happens.
    if right.month.is_none() {
        right.month = left.month;
    }
    let mut left = left;
    if left.month.is_none() {
        left.month = right.month;
    }
    // Year is usually only written once, trailing the range.
    if left.year.is_none() {
        left.year = right.year;
    }
    if right.year.is_none() {
        right.year = left.year;
    }

    let start = match (left.year, left.month, left.day) {
        (Some(y), Some(m), Some(d)) => to_utc(y, m, d),
        _ => None,
    };
    let end = match (right.year, right.month, right.day) {
        (Some(y), Some(m), Some(d)) => to_utc(y, m, d),
        _ => None,
    };

    (start, end)
}

/// Parses a single free-form date (e.g. an application deadline).
pub fn parse_single_date(text: &str) -> Option<DateTime<Utc>> {
    let p = parse_partial(text);
    match (p.year, p.month, p.day) {
        (Some(y), Some(m), Some(d)) => to_utc(y, m, d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_month_range_inherits_month() {
        let (start, end) = parse_date_range("Jan 12 - 14, 2024");
        let start = start.unwrap();
        let end = end.unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    }

    #[test]
    fn day_month_year_order_range() {
        let (start, end) = parse_date_range("15 Jan - 20 Feb 2024");
        let start = start.unwrap();
        let end = end.unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
    }

    #[test]
    fn cross_year_range_with_explicit_years() {
        let (start, end) = parse_date_range("Dec 17, 2025 - Feb 09, 2026");
        let start = start.unwrap();
        let end = end.unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 12, 17).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
    }

    #[test]
    fn ordinal_suffixes_are_stripped() {
        let deadline = parse_single_date("March 3rd, 2024").unwrap();
        assert_eq!(deadline.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }

    #[test]
    fn unparseable_text_yields_none() {
        assert!(parse_single_date("rolling admissions").is_none());
    }
}
