use opp_common::error::OppError;
use opp_common::types::Profile;
use opp_store::{MatchStore, OpportunityStore};
use uuid::Uuid;

pub const DEFAULT_MIN_SCORE: f64 = 0.3;
pub const DEFAULT_MATCH_LIMIT: i64 = 50;

/// Computes and persists matches for one profile against every active
/// opportunity. Matches below `min_score` are neither created nor updated —
/// an opportunity that drifts below the bar keeps whatever match already
/// exists rather than being deleted. Only the top `limit` scoring
/// opportunities are persisted, so a profile that qualifies against
/// thousands of opportunities doesn't write thousands of match rows.
pub struct MatchService {
    opportunities: OpportunityStore,
    matches: MatchStore,
}

impl MatchService {
    pub fn new(opportunities: OpportunityStore, matches: MatchStore) -> Self {
        Self { opportunities, matches }
    }

    pub async fn compute_matches(
        &self,
        profile: &Profile,
        limit: i64,
        min_score: f64,
    ) -> Result<Vec<Uuid>, OppError> {
        let opportunities = self.opportunities.active_opportunities().await?;
        let now = chrono::Utc::now();

        let mut scored: Vec<_> = opportunities
            .iter()
            .map(|opportunity| (opportunity, opp_scoring::score(profile, opportunity, None, now)))
            .filter(|(_, result)| result.score >= min_score)
            .collect();

        scored.sort_by(|(_, a), (_, b)| b.score.total_cmp(&a.score));
        scored.truncate(limit.max(0) as usize);

        let mut touched = Vec::new();
        for (opportunity, result) in scored {
            let id = self
                .matches
                .upsert(
                    profile.id,
                    opportunity.id,
                    result.score,
                    &result.breakdown,
                    result.eligible,
                    &result.reasons,
                    &result.suggestions,
                    &result.match_reasons,
                )
                .await?;
            touched.push(id);
        }

        Ok(touched)
    }

    pub async fn top_for_profile(&self, profile_id: Uuid, limit: i64) -> Result<Vec<opp_common::types::Match>, OppError> {
        self.matches.top_for_profile(profile_id, limit).await
    }
}
