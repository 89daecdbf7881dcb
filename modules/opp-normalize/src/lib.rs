//! Pure normalization: maps a source-tagged `RawOpportunity` to the
//! canonical `OpportunityPartial` shape. Every step here is
//! best-effort — a field that can't be parsed becomes `None` rather than
//! discarding the whole record.

mod dates;
mod dedup;
mod opportunity_type;
mod prize;

pub use dates::{parse_date_range, parse_single_date};
pub use opportunity_type::opportunity_type_for_source;
pub use prize::parse_prize_amount;

use opp_common::types::{Format, Location, OpportunityPartial, Prize, RawOpportunity};

const SHORT_DESCRIPTION_LEN: usize = 200;

pub fn normalize(raw: &RawOpportunity, source_name: &str) -> OpportunityPartial {
    let opportunity_type = opportunity_type::opportunity_type_for_source(source_name);

    let format = match raw.is_online {
        Some(true) => Format::Online,
        Some(false) => Format::InPerson,
        None => Format::Unknown,
    };

    let location = if raw.city.is_some() || raw.region.is_some() || raw.country.is_some() {
        Some(Location {
            city: raw.city.clone(),
            region: raw.region.clone(),
            country: raw.country.clone(),
        })
    } else {
        None
    };

    let urls = opp_common::types::Urls {
        website: raw.website.clone(),
        registration: raw.registration_url.clone(),
        source_page: raw.source_page.clone(),
        logo: raw.logo_url.clone(),
        banner: raw.banner_url.clone(),
    };

    let themes = dedup::dedup_trimmed(&raw.themes);
    let technologies = dedup::dedup_trimmed(&raw.technologies);

    let prizes: Vec<Prize> = raw
        .prize_text
        .iter()
        .map(|(name, text)| {
            let (amount, currency) = prize::parse_prize_amount(text);
            Prize::new(name.clone(), amount, currency)
        })
        .collect();

    let (total_prize_value, currency) = aggregate_prize_value(&prizes);

    let (team_size_min, team_size_max) = normalize_team_size(raw.team_size_min, raw.team_size_max);

    let application_deadline = raw
        .deadline_text
        .as_deref()
        .and_then(dates::parse_single_date);

    let (event_start_date, event_end_date) = raw
        .date_range_text
        .as_deref()
        .map(dates::parse_date_range)
        .unwrap_or((None, None));

    let short_description = raw
        .description
        .as_deref()
        .map(|d| truncate_chars(d, SHORT_DESCRIPTION_LEN));

    OpportunityPartial {
        source: source_name.to_string(),
        external_id: raw.external_id.clone(),
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone(),
        short_description,
        opportunity_type,
        format,
        location,
        urls,
        themes,
        technologies,
        prizes,
        total_prize_value,
        currency,
        team_size_min,
        team_size_max,
        application_deadline,
        event_start_date,
        event_end_date,
        is_student_only: raw.is_student_only.unwrap_or(false),
        is_active: true,
        remote_ok: raw.remote_ok.unwrap_or(false),
        raw_data: raw.raw_data.clone(),
    }
}

/// Sums prizes that share the most common currency in the list. Amounts in
/// other currencies are preserved per-prize but excluded from the total —
/// cross-currency conversion is an explicit open question, not guessed.
fn aggregate_prize_value(prizes: &[Prize]) -> (Option<rust_decimal::Decimal>, String) {
    if prizes.is_empty() {
        return (None, "USD".to_string());
    }

    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for p in prizes {
        *counts.entry(p.currency.as_str()).or_insert(0) += 1;
    }
    let dominant = counts
        .into_iter()
        .max_by_key(|(_, c)| *c)
        .map(|(cur, _)| cur.to_string())
        .unwrap_or_else(|| "USD".to_string());

    let total = prizes
        .iter()
        .filter(|p| p.currency == dominant)
        .filter_map(|p| p.amount)
        .fold(rust_decimal::Decimal::ZERO, |acc, amt| acc + amt);

    (Some(total), dominant)
}

/// Clamps an inverted team-size range by dropping the max rather than
/// guessing which side the source author mistyped.
fn normalize_team_size(min: Option<u32>, max: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => (Some(lo), None),
        other => other,
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opp_common::types::OpportunityType;

    fn base_raw() -> RawOpportunity {
        RawOpportunity {
            external_id: "abc123".to_string(),
            title: Some("Test Hackathon".to_string()),
            description: Some("a".repeat(300)),
            is_online: Some(true),
            themes: vec!["AI".to_string(), "ai".to_string()],
            technologies: vec!["Rust".to_string()],
            prize_text: vec![("1st place".to_string(), "$10,000".to_string())],
            team_size_min: Some(5),
            team_size_max: Some(2),
            deadline_text: Some("March 3rd, 2024".to_string()),
            raw_data: serde_json::json!({"id": "abc123"}),
            ..Default::default()
        }
    }

    #[test]
    fn maps_source_to_opportunity_type_and_format() {
        let normalized = normalize(&base_raw(), "devpost");
        assert_eq!(normalized.opportunity_type, OpportunityType::Hackathon);
        assert_eq!(normalized.format, Format::Online);
    }

    #[test]
    fn short_description_is_first_200_chars() {
        let normalized = normalize(&base_raw(), "devpost");
        assert_eq!(normalized.short_description.unwrap().chars().count(), 200);
    }

    #[test]
    fn themes_are_deduplicated_case_insensitively() {
        let normalized = normalize(&base_raw(), "devpost");
        assert_eq!(normalized.themes, vec!["AI".to_string()]);
    }

    #[test]
    fn inverted_team_size_drops_the_max() {
        let normalized = normalize(&base_raw(), "devpost");
        assert_eq!(normalized.team_size_min, Some(5));
        assert_eq!(normalized.team_size_max, None);
    }

    #[test]
    fn prize_amount_is_parsed_and_totalled() {
        let normalized = normalize(&base_raw(), "devpost");
        assert_eq!(
            normalized.total_prize_value,
            Some(rust_decimal::Decimal::from(10_000))
        );
    }

    #[test]
    fn unknown_source_never_fails_normalization() {
        let normalized = normalize(&base_raw(), "some_future_source");
        assert_eq!(normalized.opportunity_type, OpportunityType::Other);
    }
}
