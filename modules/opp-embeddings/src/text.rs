use opp_common::types::{Opportunity, Profile};

const DESCRIPTION_CHARS: usize = 2000;

/// Canonicalizes common tech shorthand to its full name before embedding —
/// `js` and `JavaScript` should land near each other in vector space.
fn expand_tech(term: &str) -> String {
    match term.to_lowercase().as_str() {
        "js" => "JavaScript".to_string(),
        "ts" => "TypeScript".to_string(),
        "py" => "Python".to_string(),
        "ml" => "Machine Learning".to_string(),
        "ai" => "Artificial Intelligence".to_string(),
        "k8s" => "Kubernetes".to_string(),
        "db" => "Database".to_string(),
        _ => term.to_string(),
    }
}

fn expand_goal(intent: &str) -> String {
    match intent.to_lowercase().as_str() {
        "funding" => "looking for funding and financial support".to_string(),
        "exposure" => "seeking exposure and visibility".to_string(),
        "learning" => "looking to learn new skills".to_string(),
        "networking" => "interested in networking with others".to_string(),
        "prizes" => "motivated by prizes and competitions".to_string(),
        "equity" => "interested in equity investment".to_string(),
        "mentorship" => "seeking mentorship".to_string(),
        other => other.to_string(),
    }
}

/// Deterministic embedding input for a profile: identity fields, then
/// expanded skills/industries/goals, joined into one sentence-like blob.
pub fn synthesize_profile_text(profile: &Profile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = &profile.display_name {
        if !name.trim().is_empty() {
            parts.push(name.clone());
        }
    }
    if let Some(bio) = &profile.bio {
        if !bio.trim().is_empty() {
            parts.push(bio.clone());
        }
    }
    if let Some(profile_type) = &profile.profile_type {
        if !profile_type.trim().is_empty() {
            parts.push(profile_type.clone());
        }
    }
    if let Some(stage) = &profile.stage {
        if !stage.trim().is_empty() {
            parts.push(stage.clone());
        }
    }
    if !profile.tech_stack.is_empty() {
        let expanded: Vec<String> = profile.tech_stack.iter().map(|t| expand_tech(t)).collect();
        parts.push(expanded.join(", "));
    }
    if !profile.industries.is_empty() {
        parts.push(profile.industries.join(", "));
    }
    if !profile.intents.is_empty() {
        let expanded: Vec<String> = profile.intents.iter().map(|i| expand_goal(i)).collect();
        parts.push(expanded.join(", "));
    }

    parts.join(". ")
}

/// Deterministic embedding input for an opportunity: title, category, a
/// capped description, then tag/technology lists.
pub fn synthesize_opportunity_text(opportunity: &Opportunity) -> String {
    let mut parts: Vec<String> = vec![opportunity.title.clone(), opportunity.opportunity_type.to_string()];

    if let Some(description) = &opportunity.description {
        let truncated: String = description.chars().take(DESCRIPTION_CHARS).collect();
        if !truncated.trim().is_empty() {
            parts.push(truncated);
        }
    }
    if !opportunity.themes.is_empty() {
        parts.push(format!("Tags: {}", opportunity.themes.join(", ")));
    }
    if !opportunity.technologies.is_empty() {
        parts.push(format!(
            "Technologies: {}",
            opportunity.technologies.join(", ")
        ));
    }

    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_text_expands_tech_abbreviations() {
        let mut profile = Profile::default();
        profile.tech_stack = vec!["js".to_string(), "py".to_string()];
        let text = synthesize_profile_text(&profile);
        assert!(text.contains("JavaScript"));
        assert!(text.contains("Python"));
    }

    #[test]
    fn profile_text_skips_blank_optional_fields() {
        let profile = Profile::default();
        assert_eq!(synthesize_profile_text(&profile), "");
    }

    #[test]
    fn opportunity_text_truncates_description() {
        use opp_common::types::{Format, OpportunityType, Urls};
        use uuid::Uuid;

        let opportunity = Opportunity {
            id: Uuid::new_v4(),
            source: "devpost".to_string(),
            external_id: "abc".to_string(),
            title: "Hack Night".to_string(),
            description: Some("x".repeat(3000)),
            short_description: None,
            opportunity_type: OpportunityType::Hackathon,
            format: Format::Online,
            location: None,
            urls: Urls::default(),
            themes: vec!["AI".to_string()],
            technologies: vec!["Rust".to_string()],
            prizes: Vec::new(),
            total_prize_value: None,
            currency: "USD".to_string(),
            team_size_min: None,
            team_size_max: None,
            application_deadline: None,
            event_start_date: None,
            event_end_date: None,
            is_student_only: false,
            is_active: true,
            remote_ok: true,
            embedding: None,
            raw_data: serde_json::json!({}),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let text = synthesize_opportunity_text(&opportunity);
        assert!(text.contains("Hack Night"));
        assert!(text.contains("Tags: AI"));
        assert!(text.contains("Technologies: Rust"));
        let description_segment = text.split(". ").nth(2).unwrap();
        assert_eq!(description_segment.chars().count(), DESCRIPTION_CHARS);
    }
}
