use opp_common::types::OpportunityType;

/// Maps a source name to its canonical opportunity type (step 1).
/// Sources not named here fall through to `Other`.
pub fn opportunity_type_for_source(source_name: &str) -> OpportunityType {
    match source_name {
        "devpost" | "mlh" | "ethglobal" | "hackerearth" => OpportunityType::Hackathon,
        "kaggle" => OpportunityType::Competition,
        "grants_gov" | "sbir" | "eu_horizon" | "innovate_uk" | "opensource_grants" => {
            OpportunityType::Grant
        }
        "hackerone" => OpportunityType::Bounty,
        "accelerators" => OpportunityType::Accelerator,
        _ => OpportunityType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sources_map_to_expected_types() {
        assert_eq!(opportunity_type_for_source("devpost"), OpportunityType::Hackathon);
        assert_eq!(opportunity_type_for_source("mlh"), OpportunityType::Hackathon);
        assert_eq!(opportunity_type_for_source("kaggle"), OpportunityType::Competition);
        assert_eq!(opportunity_type_for_source("grants_gov"), OpportunityType::Grant);
        assert_eq!(opportunity_type_for_source("hackerone"), OpportunityType::Bounty);
        assert_eq!(opportunity_type_for_source("accelerators"), OpportunityType::Accelerator);
    }

    #[test]
    fn unknown_source_falls_back_to_other() {
        assert_eq!(opportunity_type_for_source("some_new_source"), OpportunityType::Other);
    }
}
