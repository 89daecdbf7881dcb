use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Tokens that denote a non-monetary prize; normalized to a zero amount
/// rather than discarded, so the prize still shows up in the list.
const NON_MONETARY_TOKENS: &[&str] = &["knowledge", "swag", "medal", "trophy", "certificate"];

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\d,]+(?:\.\d+)?").unwrap());

/// Parses a free-form prize amount string into `(amount, currency)`.
///
/// Non-USD amounts are preserved in their native currency and never
/// converted — cross-currency aggregation is left to a later layer.
pub fn parse_prize_amount(text: &str) -> (Option<Decimal>, String) {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    if NON_MONETARY_TOKENS.iter().any(|tok| lower.contains(tok)) {
        return (Some(Decimal::ZERO), "USD".to_string());
    }

    let currency = detect_currency(trimmed);

    let Some(m) = NUMERIC_RE.find(trimmed) else {
        return (None, currency);
    };

    let cleaned = m.as_str().replace(',', "");
    let Ok(mut value) = cleaned.parse::<Decimal>() else {
        return (None, currency);
    };

    let after_number = &trimmed[m.end()..];
    let multiplier_char = after_number
        .trim_start()
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase());

    match multiplier_char {
        Some('k') => value *= Decimal::from(1_000),
        Some('m') => value *= Decimal::from(1_000_000),
        _ => {}
    }

    (Some(value), currency)
}

fn detect_currency(text: &str) -> String {
    if text.contains('€') || text.to_uppercase().contains("EUR") {
        "EUR".to_string()
    } else if text.contains('£') || text.to_uppercase().contains("GBP") {
        "GBP".to_string()
    } else if text.contains('¥') || text.to_uppercase().contains("JPY") {
        "JPY".to_string()
    } else if text.to_uppercase().contains("CAD") {
        "CAD".to_string()
    } else {
        "USD".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dollar_amount() {
        let (amount, currency) = parse_prize_amount("$10,000");
        assert_eq!(amount, Some(Decimal::from(10_000)));
        assert_eq!(currency, "USD");
    }

    #[test]
    fn k_multiplier() {
        let (amount, _) = parse_prize_amount("$5k");
        assert_eq!(amount, Some(Decimal::from(5_000)));
    }

    #[test]
    fn m_multiplier() {
        let (amount, _) = parse_prize_amount("1.2M");
        assert_eq!(amount, Some(Decimal::new(1_200_000, 0)));
    }

    #[test]
    fn non_monetary_token_becomes_zero() {
        let (amount, _) = parse_prize_amount("Knowledge and experience");
        assert_eq!(amount, Some(Decimal::ZERO));
    }

    #[test]
    fn non_usd_currency_preserved() {
        let (amount, currency) = parse_prize_amount("€2,500");
        assert_eq!(amount, Some(Decimal::from(2_500)));
        assert_eq!(currency, "EUR");
    }

    #[test]
    fn unparseable_text_returns_none() {
        let (amount, _) = parse_prize_amount("TBD");
        assert_eq!(amount, None);
    }
}
