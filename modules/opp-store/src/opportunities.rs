use opp_common::error::OppError;
use opp_common::types::{Opportunity, OpportunityPartial};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::row::OpportunityRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Inserted,
    Updated,
    Skipped,
}

pub struct UpsertOutcome {
    pub kind: UpsertKind,
    pub id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct OpportunityFilter {
    pub opportunity_type: Option<String>,
    pub search: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct OpportunityStore {
    pool: PgPool,
}

impl OpportunityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent insert-or-update keyed on `(source, external_id)`.
    /// `created_at`, `id`, and `embedding` are never touched on update —
    /// a text-only change doesn't invalidate a vector until re-indexed.
    pub async fn upsert(&self, partial: &OpportunityPartial) -> Result<UpsertOutcome, OppError> {
        match self.try_upsert(partial).await {
            Ok(outcome) => Ok(outcome),
            Err(OppError::Conflict(_)) => {
                warn!(
                    source = %partial.source,
                    external_id = %partial.external_id,
                    "lost upsert race, retrying as update"
                );
                self.try_upsert(partial).await
            }
            Err(e) => Err(e),
        }
    }

    async fn try_upsert(&self, partial: &OpportunityPartial) -> Result<UpsertOutcome, OppError> {
        let existing = self.find_by_key(&partial.source, &partial.external_id).await?;

        if existing.is_none() {
            let id = self.insert(partial).await?;
            return Ok(UpsertOutcome { kind: UpsertKind::Inserted, id });
        }

        let id = existing.unwrap();
        self.update(id, partial).await?;
        Ok(UpsertOutcome { kind: UpsertKind::Updated, id })
    }

    async fn find_by_key(&self, source: &str, external_id: &str) -> Result<Option<Uuid>, OppError> {
        let row = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM opportunities WHERE source = $1 AND external_id = $2",
        )
        .bind(source)
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(row)
    }

    async fn insert(&self, p: &OpportunityPartial) -> Result<Uuid, OppError> {
        let location = p.location.as_ref().map(|l| serde_json::to_value(l).unwrap_or_default());
        let urls = serde_json::to_value(&p.urls).unwrap_or_default();
        let prizes = serde_json::to_value(&p.prizes).unwrap_or_default();

        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO opportunities (
                source, external_id, title, description, short_description,
                opportunity_type, format, location, urls, themes, technologies,
                prizes, total_prize_value, currency, team_size_min, team_size_max,
                application_deadline, event_start_date, event_end_date,
                is_student_only, is_active, remote_ok, raw_data,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23,
                now(), now()
            )
            RETURNING id
            "#,
        )
        .bind(&p.source)
        .bind(&p.external_id)
        .bind(&p.title)
        .bind(&p.description)
        .bind(&p.short_description)
        .bind(p.opportunity_type.to_string())
        .bind(p.format.to_string())
        .bind(location)
        .bind(urls)
        .bind(&p.themes)
        .bind(&p.technologies)
        .bind(prizes)
        .bind(p.total_prize_value)
        .bind(&p.currency)
        .bind(p.team_size_min.map(|n| n as i32))
        .bind(p.team_size_max.map(|n| n as i32))
        .bind(p.application_deadline)
        .bind(p.event_start_date)
        .bind(p.event_end_date)
        .bind(p.is_student_only)
        .bind(p.is_active)
        .bind(p.remote_ok)
        .bind(&p.raw_data)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result)
    }

    async fn update(&self, id: Uuid, p: &OpportunityPartial) -> Result<(), OppError> {
        let location = p.location.as_ref().map(|l| serde_json::to_value(l).unwrap_or_default());
        let urls = serde_json::to_value(&p.urls).unwrap_or_default();
        let prizes = serde_json::to_value(&p.prizes).unwrap_or_default();

        sqlx::query(
            r#"
            UPDATE opportunities SET
                title = $1, description = $2, short_description = $3,
                opportunity_type = $4, format = $5, location = $6, urls = $7,
                themes = $8, technologies = $9, prizes = $10, total_prize_value = $11,
                currency = $12, team_size_min = $13, team_size_max = $14,
                application_deadline = $15, event_start_date = $16, event_end_date = $17,
                is_student_only = $18, is_active = $19, remote_ok = $20, raw_data = $21,
                updated_at = now()
            WHERE id = $22
            "#,
        )
        .bind(&p.title)
        .bind(&p.description)
        .bind(&p.short_description)
        .bind(p.opportunity_type.to_string())
        .bind(p.format.to_string())
        .bind(location)
        .bind(urls)
        .bind(&p.themes)
        .bind(&p.technologies)
        .bind(prizes)
        .bind(p.total_prize_value)
        .bind(&p.currency)
        .bind(p.team_size_min.map(|n| n as i32))
        .bind(p.team_size_max.map(|n| n as i32))
        .bind(p.application_deadline)
        .bind(p.event_start_date)
        .bind(p.event_end_date)
        .bind(p.is_student_only)
        .bind(p.is_active)
        .bind(p.remote_ok)
        .bind(&p.raw_data)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Opportunity>, OppError> {
        let row = sqlx::query_as::<_, OpportunityRow>(
            "SELECT * FROM opportunities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(OpportunityRow::into_opportunity))
    }

    pub async fn list(&self, filter: &OpportunityFilter) -> Result<(Vec<Opportunity>, i64), OppError> {
        let limit = filter.limit.clamp(1, 100);
        let skip = filter.skip.max(0);

        let rows = sqlx::query_as::<_, OpportunityRow>(
            r#"
            SELECT * FROM opportunities
            WHERE ($1::text IS NULL OR opportunity_type = $1)
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(&filter.opportunity_type)
        .bind(&filter.search)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT count(*) FROM opportunities
            WHERE ($1::text IS NULL OR opportunity_type = $1)
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(&filter.opportunity_type)
        .bind(&filter.search)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok((rows.into_iter().map(OpportunityRow::into_opportunity).collect(), total))
    }

    pub async fn active_without_embedding(&self, batch_size: i64) -> Result<Vec<Opportunity>, OppError> {
        let rows = sqlx::query_as::<_, OpportunityRow>(
            "SELECT * FROM opportunities WHERE is_active AND embedding IS NULL LIMIT $1",
        )
        .bind(batch_size)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(OpportunityRow::into_opportunity).collect())
    }

    pub async fn active_opportunities(&self) -> Result<Vec<Opportunity>, OppError> {
        let rows = sqlx::query_as::<_, OpportunityRow>(
            "SELECT * FROM opportunities WHERE is_active",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(OpportunityRow::into_opportunity).collect())
    }

    pub async fn set_embedding(&self, id: Uuid, embedding: &[f32]) -> Result<(), OppError> {
        sqlx::query("UPDATE opportunities SET embedding = $1 WHERE id = $2")
            .bind(pgvector::Vector::from(embedding.to_vec()))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    pub async fn embedding_stats(&self) -> Result<(i64, i64, i64), OppError> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT count(*), count(embedding) FROM opportunities",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let (total, with_embeddings) = row;
        Ok((total, with_embeddings, total - with_embeddings))
    }
}

fn map_sqlx(e: sqlx::Error) -> OppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return OppError::Conflict(db_err.message().to_string());
        }
    }
    OppError::Provider(e.to_string())
}
