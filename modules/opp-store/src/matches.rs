use std::collections::BTreeMap;

use opp_common::error::OppError;
use opp_common::types::{FactorScore, Match, MatchFactor, MatchStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct MatchRow {
    id: Uuid,
    profile_id: Uuid,
    opportunity_id: Uuid,
    score: f64,
    breakdown: serde_json::Value,
    eligible: bool,
    reasons: Vec<String>,
    suggestions: Vec<String>,
    match_reasons: Vec<String>,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRow {
    fn into_match(self) -> Match {
        Match {
            id: self.id,
            profile_id: self.profile_id,
            opportunity_id: self.opportunity_id,
            score: self.score,
            breakdown: serde_json::from_value::<BTreeMap<MatchFactor, FactorScore>>(self.breakdown)
                .unwrap_or_default(),
            eligible: self.eligible,
            reasons: self.reasons,
            suggestions: self.suggestions,
            match_reasons: self.match_reasons,
            status: parse_status(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn parse_status(s: &str) -> MatchStatus {
    match s {
        "interested" => MatchStatus::Interested,
        "applied" => MatchStatus::Applied,
        "dismissed" => MatchStatus::Dismissed,
        _ => MatchStatus::Pending,
    }
}

fn status_str(s: MatchStatus) -> &'static str {
    match s {
        MatchStatus::Pending => "pending",
        MatchStatus::Interested => "interested",
        MatchStatus::Applied => "applied",
        MatchStatus::Dismissed => "dismissed",
    }
}

#[derive(Clone)]
pub struct MatchStore {
    pool: PgPool,
}

impl MatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts on `(profile_id, opportunity_id)`. `score`/`breakdown` are
    /// always overwritten; `status` is only ever set by the caller — a
    /// re-scored match never silently resets a user's "applied" marker.
    pub async fn upsert(
        &self,
        profile_id: Uuid,
        opportunity_id: Uuid,
        score: f64,
        breakdown: &BTreeMap<MatchFactor, FactorScore>,
        eligible: bool,
        reasons: &[String],
        suggestions: &[String],
        match_reasons: &[String],
    ) -> Result<Uuid, OppError> {
        let breakdown_json = serde_json::to_value(breakdown).unwrap_or_default();

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO matches (
                profile_id, opportunity_id, score, breakdown, eligible,
                reasons, suggestions, match_reasons, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', now(), now())
            ON CONFLICT (profile_id, opportunity_id) DO UPDATE SET
                score = EXCLUDED.score,
                breakdown = EXCLUDED.breakdown,
                eligible = EXCLUDED.eligible,
                reasons = EXCLUDED.reasons,
                suggestions = EXCLUDED.suggestions,
                match_reasons = EXCLUDED.match_reasons,
                updated_at = now()
            RETURNING id
            "#,
        )
        .bind(profile_id)
        .bind(opportunity_id)
        .bind(score)
        .bind(breakdown_json)
        .bind(eligible)
        .bind(reasons)
        .bind(suggestions)
        .bind(match_reasons)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| OppError::Provider(e.to_string()))?;

        Ok(id)
    }

    pub async fn set_status(&self, id: Uuid, status: MatchStatus) -> Result<(), OppError> {
        sqlx::query("UPDATE matches SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status_str(status))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| OppError::Provider(e.to_string()))?;
        Ok(())
    }

    pub async fn top_for_profile(&self, profile_id: Uuid, limit: i64) -> Result<Vec<Match>, OppError> {
        let limit = limit.clamp(1, 50);
        let rows = sqlx::query_as::<_, MatchRow>(
            "SELECT * FROM matches WHERE profile_id = $1 ORDER BY score DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| OppError::Provider(e.to_string()))?;

        Ok(rows.into_iter().map(MatchRow::into_match).collect())
    }
}
