use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use opp_common::types::{Profile, RunStatus};
use opp_orchestrator::{MatchService, ScrapeOrchestrator, DEFAULT_MATCH_LIMIT, DEFAULT_MIN_SCORE};
use opp_store::{OpportunityFilter, OpportunityStore, ScraperRunStore};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use opp_embeddings::EmbeddingIndexer;

#[derive(Clone)]
pub struct AppState {
    pub opportunities: OpportunityStore,
    pub runs: ScraperRunStore,
    pub match_service: Arc<MatchService>,
    pub orchestrator: Arc<ScrapeOrchestrator>,
    pub indexer: Arc<EmbeddingIndexer>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/opportunities", get(list_opportunities))
        .route("/opportunities/{id}", get(get_opportunity))
        .route("/matches/compute", post(compute_matches))
        .route("/profiles/{profile_id}/matches", get(get_top_matches))
        .route("/scrape/trigger", post(trigger_scrape))
        .route("/embeddings/stats", get(get_embedding_stats))
        .route("/embeddings/embed-missing", post(embed_missing))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    opportunity_type: Option<String>,
    search: Option<String>,
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
struct ListResponse {
    items: Vec<opp_common::types::Opportunity>,
    total: i64,
}

async fn list_opportunities(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let filter = OpportunityFilter {
        opportunity_type: q.opportunity_type,
        search: q.search,
        skip: q.skip,
        limit: q.limit,
    };
    let (items, total) = state.opportunities.list(&filter).await?;
    Ok(Json(ListResponse { items, total }))
}

async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<opp_common::types::Opportunity>>, ApiError> {
    let opportunity = state.opportunities.get(id).await?;
    Ok(Json(opportunity))
}

#[derive(Debug, Deserialize)]
struct ComputeMatchesRequest {
    profile: Profile,
    #[serde(default = "default_match_limit")]
    limit: i64,
    #[serde(default = "default_min_score")]
    min_score: f64,
}

fn default_match_limit() -> i64 {
    DEFAULT_MATCH_LIMIT
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

async fn compute_matches(
    State(state): State<AppState>,
    Json(req): Json<ComputeMatchesRequest>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let ids = state
        .match_service
        .compute_matches(&req.profile, req.limit, req.min_score)
        .await?;
    Ok(Json(ids))
}

#[derive(Debug, Deserialize)]
struct TopMatchesQuery {
    #[serde(default = "default_top_limit")]
    limit: i64,
}

fn default_top_limit() -> i64 {
    50
}

async fn get_top_matches(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Query(q): Query<TopMatchesQuery>,
) -> Result<Json<Vec<opp_common::types::Match>>, ApiError> {
    let matches = state.match_service.top_for_profile(profile_id, q.limit).await?;
    Ok(Json(matches))
}

#[derive(Debug, Deserialize)]
struct TriggerScrapeRequest {
    source: String,
    #[serde(default = "default_max_pages")]
    max_pages: u32,
}

fn default_max_pages() -> u32 {
    10
}

#[derive(Debug, Serialize)]
struct TriggerScrapeResponse {
    run_id: Uuid,
    status: RunStatus,
    inserted: u32,
    updated: u32,
    skipped: u32,
}

async fn trigger_scrape(
    State(state): State<AppState>,
    Json(req): Json<TriggerScrapeRequest>,
) -> Result<Json<TriggerScrapeResponse>, ApiError> {
    let outcome = state.orchestrator.scrape_all(&req.source, req.max_pages).await?;
    Ok(Json(TriggerScrapeResponse {
        run_id: outcome.run_id,
        status: outcome.status,
        inserted: outcome.inserted,
        updated: outcome.updated,
        skipped: outcome.skipped,
    }))
}

#[derive(Debug, Serialize)]
struct EmbeddingStatsResponse {
    total: i64,
    with_embeddings: i64,
    without_embeddings: i64,
}

async fn get_embedding_stats(State(state): State<AppState>) -> Result<Json<EmbeddingStatsResponse>, ApiError> {
    let (total, with_embeddings, without_embeddings) = state.opportunities.embedding_stats().await?;
    Ok(Json(EmbeddingStatsResponse {
        total,
        with_embeddings,
        without_embeddings,
    }))
}

#[derive(Debug, Deserialize)]
struct EmbedMissingRequest {
    #[serde(default = "default_batch_size")]
    batch_size: i64,
    #[serde(default)]
    force: bool,
}

fn default_batch_size() -> i64 {
    50
}

#[derive(Debug, Serialize)]
struct EmbedMissingResponse {
    success: usize,
    failed: usize,
    skipped: usize,
}

async fn embed_missing(
    State(state): State<AppState>,
    Json(req): Json<EmbedMissingRequest>,
) -> Result<Json<EmbedMissingResponse>, ApiError> {
    let candidates = state.opportunities.active_without_embedding(req.batch_size).await?;
    let candidate_count = candidates.len();

    match state.indexer.embed_opportunities(&candidates, req.force).await {
        Ok((_ids, stats)) => Ok(Json(EmbedMissingResponse {
            success: stats.success,
            failed: 0,
            skipped: stats.skipped,
        })),
        Err(e) => {
            tracing::error!(error = %e, "embed_missing batch failed");
            Ok(Json(EmbedMissingResponse {
                success: 0,
                failed: candidate_count,
                skipped: 0,
            }))
        }
    }
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

impl From<opp_common::error::OppError> for ApiError {
    fn from(e: opp_common::error::OppError) -> Self {
        let status = match &e {
            opp_common::error::OppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            opp_common::error::OppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}
