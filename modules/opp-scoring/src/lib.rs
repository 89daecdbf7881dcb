//! Combines semantic similarity, rule-based eligibility, time-fit,
//! team-fit, and intent-fit into a single weighted match score with an
//! explainable per-factor breakdown.

mod intent_fit;
mod similarity;
mod team_fit;
mod time_fit;

pub use intent_fit::intent_fit;
pub use similarity::semantic_fit;
pub use team_fit::team_fit;
pub use time_fit::time_fit;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use opp_common::types::{FactorScore, MatchFactor, Opportunity, Profile};
use opp_rules::{evaluate, OpportunityContext, ProfileContext, RuleProgram};

pub const WEIGHT_SEMANTIC: f64 = 0.35;
pub const WEIGHT_ELIGIBILITY: f64 = 0.25;
pub const WEIGHT_TIME: f64 = 0.15;
pub const WEIGHT_TEAM: f64 = 0.10;
pub const WEIGHT_INTENT: f64 = 0.15;

pub struct ScoreResult {
    pub score: f64,
    pub breakdown: BTreeMap<MatchFactor, FactorScore>,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
    pub match_reasons: Vec<String>,
}

/// Scores a (profile, opportunity) pair. `rules` overrides the eligibility
/// program; when absent, the engine synthesizes one from the opportunity's
/// own constraints.
pub fn score(
    profile: &Profile,
    opportunity: &Opportunity,
    rules: Option<&RuleProgram>,
    now: DateTime<Utc>,
) -> ScoreResult {
    let profile_ctx = ProfileContext::from(profile);
    let opportunity_ctx = OpportunityContext::from(opportunity);
    let eval = evaluate(&profile_ctx, &opportunity_ctx, rules);

    let semantic = semantic_fit(
        profile.embedding.as_deref(),
        opportunity.embedding.as_deref(),
    );
    let eligibility = eval.score;
    let time = time_fit(opportunity.application_deadline, now);
    let team = team_fit(
        profile.team_size,
        opportunity.team_size_min,
        opportunity.team_size_max,
    );
    let intent = intent_fit(&profile.intents, &opportunity.opportunity_type.to_string());

    let total = semantic * WEIGHT_SEMANTIC
        + eligibility * WEIGHT_ELIGIBILITY
        + time * WEIGHT_TIME
        + team * WEIGHT_TEAM
        + intent * WEIGHT_INTENT;

    let mut breakdown = BTreeMap::new();
    breakdown.insert(
        MatchFactor::Semantic,
        FactorScore { score: semantic, weight: WEIGHT_SEMANTIC },
    );
    breakdown.insert(
        MatchFactor::Eligibility,
        FactorScore { score: eligibility, weight: WEIGHT_ELIGIBILITY },
    );
    breakdown.insert(
        MatchFactor::Time,
        FactorScore { score: time, weight: WEIGHT_TIME },
    );
    breakdown.insert(
        MatchFactor::Team,
        FactorScore { score: team, weight: WEIGHT_TEAM },
    );
    breakdown.insert(
        MatchFactor::Intent,
        FactorScore { score: intent, weight: WEIGHT_INTENT },
    );

    let mut match_reasons = Vec::new();
    if semantic > 0.7 {
        match_reasons.push("Strong skill/interest alignment".to_string());
    }
    if time >= 1.0 {
        match_reasons.push("Deadline falls in the ideal application window".to_string());
    }
    if team >= 1.0 {
        match_reasons.push("Team size fits the requirement exactly".to_string());
    }
    if intent >= 1.0 {
        match_reasons.push("Matches your stated goals".to_string());
    }

    let suggestions: Vec<String> = eval
        .outcomes
        .iter()
        .filter(|o| !o.passed)
        .filter_map(|o| o.suggestion.clone())
        .collect();
    let reasons: Vec<String> = eval
        .outcomes
        .iter()
        .filter(|o| !o.passed)
        .map(|o| o.reason.clone())
        .collect();

    ScoreResult {
        score: round_to_3dp(total),
        breakdown,
        eligible: eval.eligible,
        reasons,
        suggestions,
        match_reasons,
    }
}

fn round_to_3dp(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use opp_common::types::{Format, OpportunityType, Urls};
    use uuid::Uuid;

    fn base_opportunity() -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            source: "devpost".to_string(),
            external_id: "abc".to_string(),
            title: "Test Hack".to_string(),
            description: None,
            short_description: None,
            opportunity_type: OpportunityType::Hackathon,
            format: Format::Online,
            location: None,
            urls: Urls::default(),
            themes: Vec::new(),
            technologies: Vec::new(),
            prizes: Vec::new(),
            total_prize_value: None,
            currency: "USD".to_string(),
            team_size_min: Some(1),
            team_size_max: Some(5),
            application_deadline: Some(Utc::now() + Duration::days(10)),
            event_start_date: None,
            event_end_date: None,
            is_student_only: false,
            is_active: true,
            remote_ok: true,
            embedding: None,
            raw_data: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn weights_sum_to_exactly_one() {
        let sum = WEIGHT_SEMANTIC + WEIGHT_ELIGIBILITY + WEIGHT_TIME + WEIGHT_TEAM + WEIGHT_INTENT;
        assert_eq!(sum, 1.0);
    }

    #[test]
    fn score_is_in_unit_range_and_matches_weighted_sum() {
        let profile = Profile::default();
        let opportunity = base_opportunity();
        let result = score(&profile, &opportunity, None, Utc::now());

        assert!((0.0..=1.0).contains(&result.score));

        let weighted_sum: f64 = result
            .breakdown
            .values()
            .map(|f| f.score * f.weight)
            .sum();
        assert!((result.score - round_to_3dp(weighted_sum)).abs() < 1e-6);
    }

    #[test]
    fn region_mismatch_is_ineligible_and_surfaces_reason() {
        let mut profile = Profile::default();
        profile.region = Some("Germany".to_string());
        profile.tech_stack = vec!["Python".to_string()];

        let mut opportunity = base_opportunity();
        opportunity.remote_ok = false;
        opportunity.location = Some(opp_common::types::Location {
            city: None,
            region: Some("US".to_string()),
            country: None,
        });

        let result = score(&profile, &opportunity, None, Utc::now());
        assert!(!result.eligible);
        assert!(result.reasons.iter().any(|r| r.contains("region")));
    }
}
