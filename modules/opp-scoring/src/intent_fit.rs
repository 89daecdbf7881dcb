/// Maps a stated goal to the opportunity categories that typically satisfy
/// it. `None` for an unrecognized intent — it simply contributes no match.
fn acceptable_categories(intent: &str) -> Option<&'static [&'static str]> {
    match intent.to_lowercase().as_str() {
        "funding" => Some(&["grant", "accelerator", "competition"]),
        "exposure" => Some(&["hackathon", "competition", "accelerator"]),
        "learning" => Some(&["hackathon", "competition"]),
        "networking" => Some(&["hackathon", "accelerator", "conference"]),
        "prizes" => Some(&["hackathon", "competition", "bounty"]),
        "equity" => Some(&["accelerator"]),
        "mentorship" => Some(&["accelerator"]),
        _ => None,
    }
}

/// Scores how well an opportunity's category serves a profile's stated
/// intents. An exact category match counts fully; a substring relation
/// (e.g. a category name embedded in a longer table entry) counts half.
pub fn intent_fit(intents: &[String], category: &str) -> f64 {
    if intents.is_empty() || category.trim().is_empty() {
        return 0.5;
    }

    let category = category.to_lowercase();
    let mut exact_match = 0.0;
    let mut substring_match = 0.0;

    for intent in intents {
        let Some(categories) = acceptable_categories(intent) else {
            continue;
        };
        if categories.contains(&category.as_str()) {
            exact_match += 1.0;
        } else if categories
            .iter()
            .any(|c| c.contains(&category) || category.contains(c))
        {
            substring_match += 1.0;
        }
    }

    ((exact_match + 0.5 * substring_match) / intents.len() as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funding_and_networking_both_match_accelerator() {
        let intents = vec!["funding".to_string(), "networking".to_string()];
        assert!((intent_fit(&intents, "accelerator") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn learning_does_not_match_grant() {
        let intents = vec!["learning".to_string()];
        assert_eq!(intent_fit(&intents, "grant"), 0.0);
    }

    #[test]
    fn empty_intents_is_neutral() {
        assert_eq!(intent_fit(&[], "hackathon"), 0.5);
    }

    #[test]
    fn unrecognized_intent_contributes_nothing() {
        let intents = vec!["world domination".to_string()];
        assert_eq!(intent_fit(&intents, "hackathon"), 0.0);
    }
}
