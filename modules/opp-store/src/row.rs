use chrono::{DateTime, Utc};
use opp_common::types::{
    Format, Location, Opportunity, OpportunityType, Prize, Urls,
};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Maps 1:1 onto the `opportunities` table. Converting to/from the
/// canonical `Opportunity` lives here so the rest of the crate never
/// touches raw columns.
#[derive(Debug, FromRow)]
pub struct OpportunityRow {
    pub id: Uuid,
    pub source: String,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub opportunity_type: String,
    pub format: String,
    pub location: Option<serde_json::Value>,
    pub urls: serde_json::Value,
    pub themes: Vec<String>,
    pub technologies: Vec<String>,
    pub prizes: serde_json::Value,
    pub total_prize_value: Option<Decimal>,
    pub currency: String,
    pub team_size_min: Option<i32>,
    pub team_size_max: Option<i32>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub event_start_date: Option<DateTime<Utc>>,
    pub event_end_date: Option<DateTime<Utc>>,
    pub is_student_only: bool,
    pub is_active: bool,
    pub remote_ok: bool,
    pub embedding: Option<pgvector::Vector>,
    pub raw_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpportunityRow {
    pub fn into_opportunity(self) -> Opportunity {
        Opportunity {
            id: self.id,
            source: self.source,
            external_id: self.external_id,
            title: self.title,
            description: self.description,
            short_description: self.short_description,
            opportunity_type: parse_opportunity_type(&self.opportunity_type),
            format: parse_format(&self.format),
            location: self
                .location
                .and_then(|v| serde_json::from_value::<Location>(v).ok()),
            urls: serde_json::from_value::<Urls>(self.urls).unwrap_or_default(),
            themes: self.themes,
            technologies: self.technologies,
            prizes: serde_json::from_value::<Vec<Prize>>(self.prizes).unwrap_or_default(),
            total_prize_value: self.total_prize_value,
            currency: self.currency,
            team_size_min: self.team_size_min.map(|n| n as u32),
            team_size_max: self.team_size_max.map(|n| n as u32),
            application_deadline: self.application_deadline,
            event_start_date: self.event_start_date,
            event_end_date: self.event_end_date,
            is_student_only: self.is_student_only,
            is_active: self.is_active,
            remote_ok: self.remote_ok,
            embedding: self.embedding.map(|v| v.to_vec()),
            raw_data: self.raw_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn parse_opportunity_type(s: &str) -> OpportunityType {
    match s {
        "hackathon" => OpportunityType::Hackathon,
        "competition" => OpportunityType::Competition,
        "grant" => OpportunityType::Grant,
        "bounty" => OpportunityType::Bounty,
        "accelerator" => OpportunityType::Accelerator,
        _ => OpportunityType::Other,
    }
}

fn parse_format(s: &str) -> Format {
    match s {
        "online" => Format::Online,
        "in_person" => Format::InPerson,
        "hybrid" => Format::Hybrid,
        _ => Format::Unknown,
    }
}
