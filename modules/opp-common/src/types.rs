use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Opportunity (canonical record)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    Hackathon,
    Competition,
    Grant,
    Bounty,
    Accelerator,
    Other,
}

impl std::fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OpportunityType::Hackathon => "hackathon",
            OpportunityType::Competition => "competition",
            OpportunityType::Grant => "grant",
            OpportunityType::Bounty => "bounty",
            OpportunityType::Accelerator => "accelerator",
            OpportunityType::Other => "other",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Online,
    InPerson,
    Hybrid,
    #[default]
    Unknown,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Format::Online => "online",
            Format::InPerson => "in_person",
            Format::Hybrid => "hybrid",
            Format::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Urls {
    pub website: Option<String>,
    pub registration: Option<String>,
    pub source_page: Option<String>,
    pub logo: Option<String>,
    pub banner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prize {
    pub name: String,
    pub amount: Option<Decimal>,
    pub currency: String,
}

impl Prize {
    pub fn new(name: impl Into<String>, amount: Option<Decimal>, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            currency: currency.into(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub source: String,
    pub external_id: String,

    pub title: String,
    pub description: Option<String>,
    pub short_description: Option<String>,

    pub opportunity_type: OpportunityType,
    pub format: Format,
    pub location: Option<Location>,
    pub urls: Urls,

    pub themes: Vec<String>,
    pub technologies: Vec<String>,

    pub prizes: Vec<Prize>,
    pub total_prize_value: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,

    pub team_size_min: Option<u32>,
    pub team_size_max: Option<u32>,

    pub application_deadline: Option<DateTime<Utc>>,
    pub event_start_date: Option<DateTime<Utc>>,
    pub event_end_date: Option<DateTime<Utc>>,

    pub is_student_only: bool,
    pub is_active: bool,
    pub remote_ok: bool,

    pub embedding: Option<Vec<f32>>,
    pub raw_data: serde_json::Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    /// Derived, not stored: open iff active and either no deadline or the
    /// deadline hasn't passed.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.application_deadline.map(|d| now < d).unwrap_or(true)
    }
}

/// Fields produced by the normalizer before a record has an `id` or
/// `created_at`/`updated_at` assigned by the persistence gateway. Optional
/// fields that the normalizer could not derive stay `None` rather than
/// failing the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityPartial {
    pub source: String,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub opportunity_type: OpportunityType,
    pub format: Format,
    pub location: Option<Location>,
    pub urls: Urls,
    pub themes: Vec<String>,
    pub technologies: Vec<String>,
    pub prizes: Vec<Prize>,
    pub total_prize_value: Option<Decimal>,
    pub currency: String,
    pub team_size_min: Option<u32>,
    pub team_size_max: Option<u32>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub event_start_date: Option<DateTime<Utc>>,
    pub event_end_date: Option<DateTime<Utc>>,
    pub is_student_only: bool,
    pub is_active: bool,
    pub remote_ok: bool,
    pub raw_data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Raw adapter record
// ---------------------------------------------------------------------------

/// Shape an adapter can populate directly from a source payload. Dates are
/// free-form strings; normalization into `DateTime<Utc>` happens downstream
/// in the normalizer. Every field is optional — adapters may return
/// partial records and missing fields are never an ingest error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOpportunity {
    pub external_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_online: Option<bool>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub registration_url: Option<String>,
    pub source_page: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub themes: Vec<String>,
    pub technologies: Vec<String>,
    pub prize_text: Vec<(String, String)>, // (prize name, free-form amount text)
    pub team_size_min: Option<u32>,
    pub team_size_max: Option<u32>,
    pub deadline_text: Option<String>,
    pub date_range_text: Option<String>,
    pub is_student_only: Option<bool>,
    pub remote_ok: Option<bool>,
    pub raw_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeMetadata {
    pub fallback: bool,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub opportunities: Vec<RawOpportunity>,
    pub status: ScrapeStatus,
    pub errors: Vec<String>,
    pub metadata: ScrapeMetadata,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,

    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub profile_type: Option<String>,
    pub stage: Option<String>,

    pub tech_stack: Vec<String>,
    pub industries: Vec<String>,
    pub intents: Vec<String>,

    pub team_size: u32,
    pub region: Option<String>,
    pub is_student: bool,
    pub is_remote_ok: bool,

    pub embedding: Option<Vec<f32>>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            display_name: None,
            bio: None,
            profile_type: None,
            stage: None,
            tech_stack: Vec::new(),
            industries: Vec::new(),
            intents: Vec::new(),
            team_size: 1,
            region: None,
            is_student: false,
            is_remote_ok: false,
            embedding: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    Semantic,
    Eligibility,
    Time,
    Team,
    Intent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorScore {
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Interested,
    Applied,
    Dismissed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub opportunity_id: Uuid,
    pub score: f64,
    pub breakdown: BTreeMap<MatchFactor, FactorScore>,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
    pub match_reasons: Vec<String>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PartialEq for MatchFactor {
    fn eq(&self, other: &MatchFactor) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Eq for MatchFactor {}

impl PartialOrd for MatchFactor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchFactor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

// ---------------------------------------------------------------------------
// ScraperRun (audit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperRun {
    pub id: Uuid,
    pub scraper_name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub opportunities_found: u32,
    pub opportunities_created: u32,
    pub opportunities_updated: u32,
    pub errors: Vec<String>,
}

pub const MAX_RUN_ERRORS: usize = 20;
