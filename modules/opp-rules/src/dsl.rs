use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A lowercase-normalized set, compared case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSet(BTreeSet<String>);

impl RuleSet {
    pub fn new(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(values.into_iter().map(|v| v.into().to_lowercase()).collect())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(&value.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersects(&self, other: &[String]) -> bool {
        other.iter().any(|v| self.contains(v))
    }

    pub fn is_subset_of(&self, other: &[String]) -> bool {
        let lower: BTreeSet<String> = other.iter().map(|v| v.to_lowercase()).collect();
        self.0.iter().all(|v| lower.contains(v))
    }
}

/// Eligibility predicate kinds. `Unknown` is the forward-compatible
/// catch-all: unrecognized rule kinds always pass and surface a diagnostic
/// reason rather than failing eligibility outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum RuleKind {
    RegionIn(RuleSet),
    RegionNotIn(RuleSet),
    TeamMin(u32),
    TeamMax(u32),
    ProfileTypeIn(RuleSet),
    ProfileTypeNotIn(RuleSet),
    StageIn(RuleSet),
    StageNotIn(RuleSet),
    TechAny(RuleSet),
    TechAll(RuleSet),
    IndustryAny(RuleSet),
    StudentOnly,
    NotStudentOnly,
    RemoteOk,
    Unknown(String),
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::RegionIn(_) => "region_in",
            RuleKind::RegionNotIn(_) => "region_not_in",
            RuleKind::TeamMin(_) => "team_min",
            RuleKind::TeamMax(_) => "team_max",
            RuleKind::ProfileTypeIn(_) => "profile_type_in",
            RuleKind::ProfileTypeNotIn(_) => "profile_type_not_in",
            RuleKind::StageIn(_) => "stage_in",
            RuleKind::StageNotIn(_) => "stage_not_in",
            RuleKind::TechAny(_) => "tech_any",
            RuleKind::TechAll(_) => "tech_all",
            RuleKind::IndustryAny(_) => "industry_any",
            RuleKind::StudentOnly => "student_only",
            RuleKind::NotStudentOnly => "not_student_only",
            RuleKind::RemoteOk => "remote_ok",
            RuleKind::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleProgram {
    pub rules: Vec<RuleKind>,
    pub mode: Mode,
}
