use async_trait::async_trait;
use opp_common::error::OppError;
use opp_common::types::{RawOpportunity, ScrapeResult};

/// One adapter per external source. Implementors are either HTTP-only
/// (a pooled `reqwest::Client`) or headless-browser backed; the trait
/// doesn't distinguish — the fetch mechanism is an implementation detail.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source_name(&self) -> &str;
    fn base_url(&self) -> &str;

    /// Per-adapter minimum delay between list-page requests.
    fn request_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(2)
    }

    /// Fetches one page of listing data. Pagination is 1-based; an empty
    /// result set is the termination signal.
    async fn scrape_list(&self, page: u32) -> Result<ScrapeResult, OppError>;

    /// Optional detail fetch. `None` means unsupported or unreachable —
    /// never an error.
    async fn scrape_detail(&self, _external_id: &str, _url: &str) -> Option<RawOpportunity> {
        None
    }
}

/// Deduplicates a fetched page against a curated fallback table on
/// `external_id`, keeping the fetched entry when both are present.
pub fn merge_with_fallback(
    fetched: Vec<RawOpportunity>,
    fallback: &[RawOpportunity],
    fallback_threshold: usize,
) -> (Vec<RawOpportunity>, bool) {
    if fetched.len() >= fallback_threshold {
        return (fetched, false);
    }

    let mut seen: std::collections::HashSet<String> =
        fetched.iter().map(|r| r.external_id.clone()).collect();
    let mut merged = fetched;
    for entry in fallback {
        if seen.insert(entry.external_id.clone()) {
            merged.push(entry.clone());
        }
    }
    (merged, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> RawOpportunity {
        RawOpportunity {
            external_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn fallback_merges_only_when_under_threshold() {
        let fetched = vec![raw("a"), raw("b")];
        let fallback = vec![raw("b"), raw("c")];
        let (merged, used_fallback) = merge_with_fallback(fetched, &fallback, 5);
        assert!(used_fallback);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn fallback_is_skipped_when_fetch_meets_threshold() {
        let fetched = vec![raw("a"), raw("b"), raw("c"), raw("d"), raw("e")];
        let fallback = vec![raw("z")];
        let (merged, used_fallback) = merge_with_fallback(fetched, &fallback, 5);
        assert!(!used_fallback);
        assert_eq!(merged.len(), 5);
    }
}
