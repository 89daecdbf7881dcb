use async_trait::async_trait;
use opp_common::error::OppError;
use opp_common::types::{RawOpportunity, ScrapeMetadata, ScrapeResult, ScrapeStatus};
use reqwest::Client;

use crate::adapter::{merge_with_fallback, SourceAdapter};
use crate::http_base::{build_client, fetch_json};

const BASE_URL: &str = "https://devpost.com";
const FALLBACK_THRESHOLD: usize = 5;

/// HTTP-only adapter for Devpost's public hackathon listing API.
pub struct DevpostAdapter {
    client: Client,
}

impl DevpostAdapter {
    pub fn new() -> Result<Self, OppError> {
        Ok(Self {
            client: build_client().map_err(|e| OppError::Other(e.into()))?,
        })
    }

    fn fallback_entries() -> Vec<RawOpportunity> {
        vec![
            RawOpportunity {
                external_id: "mlh-global-hack-week".to_string(),
                title: Some("MLH Global Hack Week".to_string()),
                is_online: Some(true),
                themes: vec!["student".to_string()],
                ..Default::default()
            },
            RawOpportunity {
                external_id: "nasa-space-apps".to_string(),
                title: Some("NASA Space Apps Challenge".to_string()),
                is_online: Some(false),
                themes: vec!["space".to_string(), "science".to_string()],
                ..Default::default()
            },
        ]
    }

    fn parse_listing(&self, payload: &serde_json::Value) -> Vec<RawOpportunity> {
        payload
            .get("hackathons")
            .and_then(|v| v.as_array())
            .map(|entries| entries.iter().filter_map(parse_hackathon).collect())
            .unwrap_or_default()
    }
}

fn parse_hackathon(entry: &serde_json::Value) -> Option<RawOpportunity> {
    let external_id = entry.get("id")?.as_u64()?.to_string();
    let title = entry.get("title").and_then(|v| v.as_str()).map(str::to_string);
    let description = entry
        .get("tagline")
        .or_else(|| entry.get("description"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let website = entry.get("url").and_then(|v| v.as_str()).map(str::to_string);
    let deadline_text = entry
        .get("submission_period_dates")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let themes = entry
        .get("themes")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.get("name").and_then(|n| n.as_str()).map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let is_online = entry.get("displayed_location").and_then(|v| v.get("online")).and_then(|v| v.as_bool());
    let prize_text = entry
        .get("prize_amount")
        .and_then(|v| v.as_str())
        .map(|p| vec![("Total prizes".to_string(), p.to_string())])
        .unwrap_or_default();

    Some(RawOpportunity {
        external_id,
        title,
        description,
        website,
        deadline_text,
        themes,
        is_online,
        prize_text,
        raw_data: entry.clone(),
        ..Default::default()
    })
}

#[async_trait]
impl SourceAdapter for DevpostAdapter {
    fn source_name(&self) -> &str {
        "devpost"
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn scrape_list(&self, page: u32) -> Result<ScrapeResult, OppError> {
        let url = format!("{BASE_URL}/api/hackathons?page={page}&status[]=open");
        let payload = fetch_json(&self.client, &url).await?;
        let fetched = self.parse_listing(&payload);

        let (opportunities, used_fallback) = if page == 1 {
            merge_with_fallback(fetched, &Self::fallback_entries(), FALLBACK_THRESHOLD)
        } else {
            (fetched, false)
        };

        Ok(ScrapeResult {
            opportunities,
            status: ScrapeStatus::Success,
            errors: Vec::new(),
            metadata: ScrapeMetadata {
                fallback: used_fallback,
                page,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_entries_from_devpost_payload() {
        let adapter = DevpostAdapter {
            client: build_client().unwrap(),
        };
        let payload = serde_json::json!({
            "hackathons": [{
                "id": 12345,
                "title": "Global Hack 2026",
                "tagline": "Build something great",
                "url": "https://globalhack2026.devpost.com",
                "submission_period_dates": "Jan 01 - Feb 01, 2026",
                "themes": [{"name": "AI"}, {"name": "Climate"}],
                "displayed_location": {"online": true},
                "prize_amount": "$50,000"
            }]
        });
        let parsed = adapter.parse_listing(&payload);
        assert_eq!(parsed.len(), 1);
        let entry = &parsed[0];
        assert_eq!(entry.external_id, "12345");
        assert_eq!(entry.title.as_deref(), Some("Global Hack 2026"));
        assert_eq!(entry.is_online, Some(true));
        assert_eq!(entry.themes, vec!["AI".to_string(), "Climate".to_string()]);
        assert_eq!(entry.prize_text, vec![("Total prizes".to_string(), "$50,000".to_string())]);
    }

    #[test]
    fn skips_entries_missing_an_id() {
        let adapter = DevpostAdapter {
            client: build_client().unwrap(),
        };
        let payload = serde_json::json!({ "hackathons": [{"title": "No id here"}] });
        assert!(adapter.parse_listing(&payload).is_empty());
    }
}
