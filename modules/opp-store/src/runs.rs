use opp_common::error::OppError;
use opp_common::types::{RunStatus, ScraperRun, MAX_RUN_ERRORS};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ScraperRunRow {
    id: Uuid,
    scraper_name: String,
    started_at: chrono::DateTime<chrono::Utc>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    status: String,
    opportunities_found: i32,
    opportunities_created: i32,
    opportunities_updated: i32,
    errors: Vec<String>,
}

impl ScraperRunRow {
    fn into_run(self) -> ScraperRun {
        ScraperRun {
            id: self.id,
            scraper_name: self.scraper_name,
            started_at: self.started_at,
            completed_at: self.completed_at,
            status: parse_status(&self.status),
            opportunities_found: self.opportunities_found as u32,
            opportunities_created: self.opportunities_created as u32,
            opportunities_updated: self.opportunities_updated as u32,
            errors: self.errors,
        }
    }
}

fn parse_status(s: &str) -> RunStatus {
    match s {
        "running" => RunStatus::Running,
        "success" => RunStatus::Success,
        "partial" => RunStatus::Partial,
        "failed" => RunStatus::Failed,
        _ => RunStatus::Pending,
    }
}

fn status_str(s: RunStatus) -> &'static str {
    match s {
        RunStatus::Pending => "pending",
        RunStatus::Running => "running",
        RunStatus::Success => "success",
        RunStatus::Partial => "partial",
        RunStatus::Failed => "failed",
    }
}

#[derive(Clone)]
pub struct ScraperRunStore {
    pool: PgPool,
}

impl ScraperRunStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, scraper_name: &str) -> Result<ScraperRun, OppError> {
        let row = sqlx::query_as::<_, ScraperRunRow>(
            r#"
            INSERT INTO scraper_runs (scraper_name, started_at, status)
            VALUES ($1, now(), 'running')
            RETURNING *
            "#,
        )
        .bind(scraper_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| OppError::Provider(e.to_string()))?;

        Ok(row.into_run())
    }

    /// Caps `errors` at `MAX_RUN_ERRORS`, keeping the earliest entries —
    /// the first failures are usually the most diagnostic.
    pub async fn finalize(
        &self,
        id: Uuid,
        status: RunStatus,
        found: u32,
        created: u32,
        updated: u32,
        errors: &[String],
    ) -> Result<(), OppError> {
        let capped: Vec<String> = errors.iter().take(MAX_RUN_ERRORS).cloned().collect();

        sqlx::query(
            r#"
            UPDATE scraper_runs SET
                status = $1,
                completed_at = now(),
                opportunities_found = $2,
                opportunities_created = $3,
                opportunities_updated = $4,
                errors = $5
            WHERE id = $6
            "#,
        )
        .bind(status_str(status))
        .bind(found as i32)
        .bind(created as i32)
        .bind(updated as i32)
        .bind(&capped)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| OppError::Provider(e.to_string()))?;

        Ok(())
    }
}
