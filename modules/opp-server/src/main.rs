mod routes;

use std::sync::Arc;

use ai_client::OpenAiEmbeddings;
use anyhow::Result;
use opp_common::config::Config;
use opp_embeddings::EmbeddingIndexer;
use opp_orchestrator::{MatchService, ScrapeOrchestrator, Scheduler};
use opp_store::{MatchStore, OpportunityStore, ScraperRunStore};
use tracing_subscriber::EnvFilter;

/// Page cap for a single scheduled run, matching the on-demand endpoint's
/// default so unattended runs behave like a manually triggered one.
const SCHEDULED_MAX_PAGES: u32 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    tracing::info!("starting opp-server");

    let config = Config::from_env();

    let pool = opp_store::connect(&config.record_store_url).await?;
    opp_store::run_migrations(&pool).await?;
    tracing::info!("migrations complete");

    let opportunities = OpportunityStore::new(pool.clone());
    let matches = MatchStore::new(pool.clone());
    let runs = ScraperRunStore::new(pool.clone());

    let embedding_provider = Arc::new(OpenAiEmbeddings::new(&config.embedding_provider_key));
    let indexer = Arc::new(EmbeddingIndexer::new(embedding_provider, opportunities.clone()));

    let registry = Arc::new(opp_adapters::build_default_registry(&config));
    let orchestrator = Arc::new(ScrapeOrchestrator::new(
        registry.clone(),
        opportunities.clone(),
        runs.clone(),
        indexer.clone(),
    ));
    let match_service = Arc::new(MatchService::new(opportunities.clone(), matches));

    Arc::new(Scheduler::new(
        orchestrator.clone(),
        registry,
        config.clone(),
        SCHEDULED_MAX_PAGES,
    ))
    .spawn();

    let state = routes::AppState {
        opportunities,
        runs,
        match_service,
        orchestrator,
        indexer,
    };

    let app = routes::build_router(state);
    let addr = "0.0.0.0:8080";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
