use std::sync::Arc;

use opp_adapters::{with_backoff, CircuitBreaker, SourceAdapter, SourceRegistry};
use opp_common::config::Config;
use opp_common::error::OppError;
use opp_common::types::{RawOpportunity, RunStatus};
use opp_embeddings::EmbeddingIndexer;
use opp_store::{OpportunityStore, ScraperRunStore, UpsertKind};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub inserted: u32,
    pub updated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

/// Drives the per-source ingestion flow: adapter → breaker → normalizer
/// → store, then hands new rows to the embedding indexer on a side task.
pub struct ScrapeOrchestrator {
    registry: Arc<SourceRegistry>,
    opportunities: OpportunityStore,
    runs: ScraperRunStore,
    indexer: Arc<EmbeddingIndexer>,
}

impl ScrapeOrchestrator {
    pub fn new(
        registry: Arc<SourceRegistry>,
        opportunities: OpportunityStore,
        runs: ScraperRunStore,
        indexer: Arc<EmbeddingIndexer>,
    ) -> Self {
        Self {
            registry,
            opportunities,
            runs,
            indexer,
        }
    }

    pub async fn scrape_all(&self, source: &str, max_pages: u32) -> Result<ScrapeOutcome, OppError> {
        let registered = self
            .registry
            .get(source)
            .ok_or_else(|| OppError::InvalidInput(format!("unknown source: {source}")))?;

        let run = self.runs.create(source).await?;
        let (fetched, mut errors) =
            run_list_phase(registered.adapter.as_ref(), &registered.breaker, max_pages).await;

        let found = fetched.len() as u32;
        let (inserted, updated, skipped, persisted) = self.persist(source, &fetched, &mut errors).await;

        if !persisted.is_empty() {
            self.spawn_embedding_pass(persisted.len());
        }

        let status = decide_status(&errors, inserted + updated);

        self.runs
            .finalize(run.id, status, found, inserted, updated, &errors)
            .await?;

        Ok(ScrapeOutcome {
            run_id: run.id,
            status,
            inserted,
            updated,
            skipped,
            errors,
        })
    }

    /// Runs every source the config hasn't disabled, one after another.
    /// Used by the scheduled job; sources are independent so a failed run
    /// on one never stops the rest.
    pub async fn scrape_enabled(&self, config: &Config, max_pages: u32) -> Vec<ScrapeOutcome> {
        let mut outcomes = Vec::new();
        let names: Vec<String> = self
            .registry
            .enabled(config)
            .into_iter()
            .map(|s| s.adapter.source_name().to_string())
            .collect();

        for name in names {
            match self.scrape_all(&name, max_pages).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(source = %name, error = %e, "scheduled scrape failed"),
            }
        }
        outcomes
    }

    async fn persist(
        &self,
        source: &str,
        fetched: &[RawOpportunity],
        errors: &mut Vec<String>,
    ) -> (u32, u32, u32, Vec<Uuid>) {
        let mut inserted = 0u32;
        let mut updated = 0u32;
        let mut skipped = 0u32;
        let mut persisted = Vec::new();

        for raw in fetched {
            let partial = opp_normalize::normalize(raw, source);
            match self.opportunities.upsert(&partial).await {
                Ok(outcome) => {
                    match outcome.kind {
                        UpsertKind::Inserted => inserted += 1,
                        UpsertKind::Updated => updated += 1,
                        UpsertKind::Skipped => skipped += 1,
                    }
                    persisted.push(outcome.id);
                }
                Err(e) => {
                    error!(source, external_id = %raw.external_id, error = %e, "failed to persist record");
                    errors.push(e.to_string());
                    skipped += 1;
                }
            }
        }

        (inserted, updated, skipped, persisted)
    }

    /// Fire-and-forget: runs alongside further ingestion rather than
    /// blocking this run's finalization on provider latency.
    fn spawn_embedding_pass(&self, batch_hint: usize) {
        let store = self.opportunities.clone();
        let indexer = self.indexer.clone();
        tokio::spawn(async move {
            match store.active_without_embedding(batch_hint.max(1) as i64).await {
                Ok(candidates) => {
                    if let Err(e) = indexer.embed_opportunities(&candidates, false).await {
                        error!(error = %e, "embedding pass failed");
                    }
                }
                Err(e) => error!(error = %e, "failed to load embedding candidates"),
            }
        });
    }
}

/// The breaker-gated list-page loop, pulled out of `scrape_all` so it can
/// run against a mock adapter without a database.
async fn run_list_phase(
    adapter: &dyn SourceAdapter,
    breaker: &CircuitBreaker,
    max_pages: u32,
) -> (Vec<RawOpportunity>, Vec<String>) {
    let mut fetched = Vec::new();
    let mut errors = Vec::new();
    let mut page = 1u32;

    while page <= max_pages {
        if !breaker.can_execute() {
            info!(page, "breaker open, stopping run");
            break;
        }

        let result = with_backoff(|| adapter.scrape_list(page)).await;

        match result {
            Ok(scrape_result) => {
                breaker.record_success();
                let exhausted = scrape_result.opportunities.is_empty();
                fetched.extend(scrape_result.opportunities);
                errors.extend(scrape_result.errors);
                if exhausted {
                    break;
                }
                tokio::time::sleep(adapter.request_delay()).await;
                page += 1;
            }
            Err(e) => {
                let weight = if matches!(e, OppError::BlockedByAntiBot(_)) { 2 } else { 1 };
                breaker.record_failure_weighted(weight);
                warn!(error = %e, "list scrape failed, ending run");
                errors.push(e.to_string());
                break;
            }
        }
    }

    (fetched, errors)
}

fn decide_status(errors: &[String], persisted: u32) -> RunStatus {
    if errors.is_empty() {
        RunStatus::Success
    } else if persisted > 0 {
        RunStatus::Partial
    } else {
        RunStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use opp_common::types::{ScrapeMetadata, ScrapeResult, ScrapeStatus};
    use opp_adapters::CircuitBreakerConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct FlakyAdapter {
        calls: AtomicU32,
    }

    #[async_trait]
    impl SourceAdapter for FlakyAdapter {
        fn source_name(&self) -> &str {
            "flaky"
        }

        fn base_url(&self) -> &str {
            "https://example.test"
        }

        fn request_delay(&self) -> Duration {
            Duration::from_millis(1)
        }

        async fn scrape_list(&self, _page: u32) -> Result<ScrapeResult, OppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(OppError::TransientNetwork("connection refused".to_string()))
        }
    }

    struct TwoPageAdapter;

    #[async_trait]
    impl SourceAdapter for TwoPageAdapter {
        fn source_name(&self) -> &str {
            "two-page"
        }

        fn base_url(&self) -> &str {
            "https://example.test"
        }

        fn request_delay(&self) -> Duration {
            Duration::from_millis(1)
        }

        async fn scrape_list(&self, page: u32) -> Result<ScrapeResult, OppError> {
            let opportunities = if page <= 2 {
                vec![RawOpportunity {
                    external_id: format!("item-{page}"),
                    title: Some(format!("Item {page}")),
                    ..Default::default()
                }]
            } else {
                Vec::new()
            };
            Ok(ScrapeResult {
                opportunities,
                status: ScrapeStatus::Success,
                errors: Vec::new(),
                metadata: ScrapeMetadata { fallback: false, page },
            })
        }
    }

    #[tokio::test]
    async fn repeated_failures_open_the_breaker_and_end_the_run() {
        let adapter = FlakyAdapter { calls: AtomicU32::new(0) };
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout: Duration::from_secs(300),
            half_open_max_calls: 2,
        });

        let (fetched, errors) = run_list_phase(&adapter, &breaker, 5).await;

        assert!(fetched.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(breaker.state(), opp_adapters::CircuitState::Open);
        // with_backoff retries internally, but run_list_phase stops after
        // the first page fails (breaker opens, loop breaks) — it never
        // reaches a second page.
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn pagination_stops_at_first_empty_page() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());
        let (fetched, errors) = run_list_phase(&TwoPageAdapter, &breaker, 10).await;

        assert!(errors.is_empty());
        assert_eq!(fetched.len(), 2);
    }

    #[test]
    fn status_is_success_when_no_errors() {
        assert_eq!(decide_status(&[], 3), RunStatus::Success);
    }

    #[test]
    fn status_is_partial_when_errors_but_rows_persisted() {
        assert_eq!(decide_status(&["boom".to_string()], 1), RunStatus::Partial);
    }

    #[test]
    fn status_is_failed_when_errors_and_nothing_persisted() {
        assert_eq!(decide_status(&["boom".to_string()], 0), RunStatus::Failed);
    }
}
