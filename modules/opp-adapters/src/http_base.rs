use opp_common::error::OppError;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; OpportunityAggregatorBot/1.0; +https://example.com/bot)";

/// Pooled HTTP client shared by HTTP-only adapters. Sends a realistic
/// browser user-agent and follows redirects, per the adapter contract.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(Duration::from_secs(30))
        .build()
}

pub async fn fetch_json(client: &Client, url: &str) -> Result<serde_json::Value, OppError> {
    let response = client.get(url).send().await.map_err(classify_reqwest_err)?;
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(OppError::RateLimited(format!("{url} returned 429")));
    }
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(OppError::BlockedByAntiBot(format!("{url} returned 403")));
    }
    if !status.is_success() {
        return Err(OppError::TransientNetwork(format!("{url} returned {status}")));
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| OppError::SourceParse(e.to_string()))
}

fn classify_reqwest_err(e: reqwest::Error) -> OppError {
    OppError::TransientNetwork(e.to_string())
}
