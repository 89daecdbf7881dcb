use opp_common::types::{Opportunity, Profile};

/// The subset of a profile the rule engine evaluates against. Decoupled from
/// the persisted `Profile` so rules never reach back into the full record.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub region: Option<String>,
    pub team_size: u32,
    pub profile_type: Option<String>,
    pub stage: Option<String>,
    pub tech_stack: Vec<String>,
    pub industries: Vec<String>,
    pub is_student: bool,
    pub is_remote_ok: bool,
}

impl From<&Profile> for ProfileContext {
    fn from(p: &Profile) -> Self {
        Self {
            region: p.region.clone(),
            team_size: p.team_size,
            profile_type: p.profile_type.clone(),
            stage: p.stage.clone(),
            tech_stack: p.tech_stack.clone(),
            industries: p.industries.clone(),
            is_student: p.is_student,
            is_remote_ok: p.is_remote_ok,
        }
    }
}

/// The subset of an opportunity the rule engine evaluates against.
#[derive(Debug, Clone)]
pub struct OpportunityContext {
    pub regions: Vec<String>,
    pub team_min: Option<u32>,
    pub team_max: Option<u32>,
    pub is_student_only: bool,
    pub remote_ok: bool,
}

impl From<&Opportunity> for OpportunityContext {
    fn from(o: &Opportunity) -> Self {
        let regions = o
            .location
            .as_ref()
            .and_then(|l| l.region.clone())
            .into_iter()
            .collect();
        Self {
            regions,
            team_min: o.team_size_min,
            team_max: o.team_size_max,
            is_student_only: o.is_student_only,
            remote_ok: o.remote_ok,
        }
    }
}
