use serde::{Deserialize, Serialize};

use crate::context::{OpportunityContext, ProfileContext};
use crate::dsl::{Mode, RuleKind, RuleProgram, RuleSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_kind: String,
    pub passed: bool,
    pub reason: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalResult {
    pub outcomes: Vec<RuleOutcome>,
    pub eligible: bool,
    /// `passed_count / total`, or 1.0 when there are no rules.
    pub score: f64,
}

/// Evaluates a profile/opportunity pair against an eligibility program
///. When `program` is `None`, rules are synthesized from the
/// opportunity context itself.
pub fn evaluate(
    profile: &ProfileContext,
    opportunity: &OpportunityContext,
    program: Option<&RuleProgram>,
) -> EvalResult {
    let owned_program;
    let program = match program {
        Some(p) => p,
        None => {
            owned_program = synthesize(opportunity);
            &owned_program
        }
    };

    let outcomes: Vec<RuleOutcome> = program
        .rules
        .iter()
        .map(|rule| evaluate_rule(profile, opportunity, rule))
        .collect();

    let total = outcomes.len();
    let passed_count = outcomes.iter().filter(|o| o.passed).count();

    let eligible = if total == 0 {
        true
    } else {
        match program.mode {
            Mode::All => passed_count == total,
            Mode::Any => passed_count >= 1,
        }
    };

    let score = if total == 0 {
        1.0
    } else {
        passed_count as f64 / total as f64
    };

    EvalResult {
        outcomes,
        eligible,
        score,
    }
}

/// Builds a rule program from the opportunity's own constraints when the
/// caller supplies none. Mode defaults to `all`.
fn synthesize(opportunity: &OpportunityContext) -> RuleProgram {
    let mut rules = Vec::new();

    let non_global_regions: Vec<&String> = opportunity
        .regions
        .iter()
        .filter(|r| !r.eq_ignore_ascii_case("global"))
        .collect();
    if !non_global_regions.is_empty() {
        rules.push(RuleKind::RegionIn(RuleSet::new(
            non_global_regions.into_iter().cloned(),
        )));
    }

    if let Some(min) = opportunity.team_min {
        rules.push(RuleKind::TeamMin(min));
    }
    if let Some(max) = opportunity.team_max {
        rules.push(RuleKind::TeamMax(max));
    }
    if opportunity.is_student_only {
        rules.push(RuleKind::StudentOnly);
    }

    RuleProgram {
        rules,
        mode: Mode::All,
    }
}

fn evaluate_rule(
    profile: &ProfileContext,
    opportunity: &OpportunityContext,
    rule: &RuleKind,
) -> RuleOutcome {
    let kind = rule.name().to_string();

    match rule {
        RuleKind::RegionIn(set) => {
            let passed = set.is_empty()
                || set.contains("global")
                || profile.region.as_deref().map(|r| set.contains(r)).unwrap_or(false);
            outcome(kind, passed, "region eligibility", "Check if this opportunity is open in your region")
        }
        RuleKind::RegionNotIn(set) => {
            let passed = !profile.region.as_deref().map(|r| set.contains(r)).unwrap_or(false);
            outcome(kind, passed, "region exclusion", "This opportunity excludes your region")
        }
        RuleKind::TeamMin(n) => {
            let passed = profile.team_size >= *n;
            outcome(
                kind,
                passed,
                &format!("requires a team of at least {n}"),
                &format!("Grow your team to at least {n} members"),
            )
        }
        RuleKind::TeamMax(n) => {
            let passed = profile.team_size <= *n;
            outcome(
                kind,
                passed,
                &format!("requires a team of at most {n}"),
                &format!("Trim your team to at most {n} members"),
            )
        }
        RuleKind::ProfileTypeIn(set) => {
            let passed = set.is_empty()
                || profile.profile_type.as_deref().map(|t| set.contains(t)).unwrap_or(false);
            outcome(kind, passed, "profile type eligibility", "Update your profile type")
        }
        RuleKind::ProfileTypeNotIn(set) => {
            let passed = !profile.profile_type.as_deref().map(|t| set.contains(t)).unwrap_or(false);
            outcome(kind, passed, "profile type exclusion", "This opportunity excludes your profile type")
        }
        RuleKind::StageIn(set) => {
            let passed = set.is_empty()
                || profile.stage.as_deref().map(|s| set.contains(s)).unwrap_or(false);
            outcome(kind, passed, "stage eligibility", "Check the required stage")
        }
        RuleKind::StageNotIn(set) => {
            let passed = !profile.stage.as_deref().map(|s| set.contains(s)).unwrap_or(false);
            outcome(kind, passed, "stage exclusion", "This opportunity excludes your stage")
        }
        RuleKind::TechAny(set) => {
            let passed = set.intersects(&profile.tech_stack);
            outcome(kind, passed, "requires familiarity with a listed technology", "Add a required technology to your stack")
        }
        RuleKind::TechAll(set) => {
            let passed = set.is_subset_of(&profile.tech_stack);
            outcome(kind, passed, "requires all listed technologies", "Fill in the missing required technologies")
        }
        RuleKind::IndustryAny(set) => {
            let passed = set.intersects(&profile.industries);
            outcome(kind, passed, "requires a matching industry", "Add a matching industry to your profile")
        }
        RuleKind::StudentOnly => {
            let passed = profile.is_student || profile.profile_type.as_deref() == Some("student");
            outcome(kind, passed, "student-only opportunity", "This opportunity is restricted to students")
        }
        RuleKind::NotStudentOnly => outcome(kind, true, "no student restriction", ""),
        RuleKind::RemoteOk => {
            let passed = opportunity.remote_ok || profile.is_remote_ok;
            outcome(kind, passed, "requires remote eligibility", "This opportunity requires in-person or remote-ok participation")
        }
        RuleKind::Unknown(label) => RuleOutcome {
            rule_kind: kind,
            passed: true,
            reason: format!("unrecognized rule kind '{label}' — treated as passing"),
            suggestion: None,
        },
    }
}

fn outcome(kind: String, passed: bool, reason: &str, suggestion: &str) -> RuleOutcome {
    RuleOutcome {
        rule_kind: kind,
        passed,
        reason: reason.to_string(),
        suggestion: if passed || suggestion.is_empty() {
            None
        } else {
            Some(suggestion.to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(region: &str, tech: &[&str]) -> ProfileContext {
        ProfileContext {
            region: Some(region.to_string()),
            team_size: 1,
            profile_type: None,
            stage: None,
            tech_stack: tech.iter().map(|s| s.to_string()).collect(),
            industries: Vec::new(),
            is_student: false,
            is_remote_ok: false,
        }
    }

    fn opportunity(regions: &[&str]) -> OpportunityContext {
        OpportunityContext {
            regions: regions.iter().map(|s| s.to_string()).collect(),
            team_min: None,
            team_max: None,
            is_student_only: false,
            remote_ok: false,
        }
    }

    #[test]
    fn region_mismatch_is_ineligible_with_synthesized_rules() {
        let p = profile("Germany", &["Python"]);
        let o = opportunity(&["US"]);
        let result = evaluate(&p, &o, None);
        assert!(!result.eligible);
        assert_eq!(result.outcomes[0].rule_kind, "region_in");
        assert!(!result.outcomes[0].passed);
    }

    #[test]
    fn global_region_always_passes() {
        let p = profile("Germany", &[]);
        let o = opportunity(&["global"]);
        let result = evaluate(&p, &o, None);
        assert!(result.eligible);
    }

    #[test]
    fn no_rules_is_fully_eligible_with_score_one() {
        let p = profile("Germany", &[]);
        let o = opportunity(&[]);
        let result = evaluate(&p, &o, None);
        assert!(result.eligible);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn adding_passing_rule_never_lowers_score_p5() {
        let p = profile("US", &["Rust"]);
        let program_one = RuleProgram {
            rules: vec![RuleKind::RegionIn(RuleSet::new(["US"]))],
            mode: Mode::All,
        };
        let program_two = RuleProgram {
            rules: vec![
                RuleKind::RegionIn(RuleSet::new(["US"])),
                RuleKind::TechAny(RuleSet::new(["Rust"])),
            ],
            mode: Mode::All,
        };
        let o = opportunity(&[]);
        let r1 = evaluate(&p, &o, Some(&program_one));
        let r2 = evaluate(&p, &o, Some(&program_two));
        assert!(r2.score >= r1.score);
        assert!(r2.eligible);
    }

    #[test]
    fn failing_rule_in_all_mode_is_ineligible_p5() {
        let p = profile("US", &[]);
        let program = RuleProgram {
            rules: vec![
                RuleKind::RegionIn(RuleSet::new(["US"])),
                RuleKind::TechAny(RuleSet::new(["Rust"])),
            ],
            mode: Mode::All,
        };
        let o = opportunity(&[]);
        let result = evaluate(&p, &o, Some(&program));
        assert!(!result.eligible);
    }

    #[test]
    fn unknown_rule_kind_always_passes() {
        let p = profile("US", &[]);
        let program = RuleProgram {
            rules: vec![RuleKind::Unknown("future_rule".to_string())],
            mode: Mode::All,
        };
        let o = opportunity(&[]);
        let result = evaluate(&p, &o, Some(&program));
        assert!(result.eligible);
        assert!(result.outcomes[0].passed);
    }

    #[test]
    fn any_mode_passes_with_one_match() {
        let p = profile("Germany", &["Rust"]);
        let program = RuleProgram {
            rules: vec![
                RuleKind::RegionIn(RuleSet::new(["US"])),
                RuleKind::TechAny(RuleSet::new(["Rust"])),
            ],
            mode: Mode::Any,
        };
        let o = opportunity(&[]);
        let result = evaluate(&p, &o, Some(&program));
        assert!(result.eligible);
    }
}
