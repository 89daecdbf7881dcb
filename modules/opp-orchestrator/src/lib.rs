mod match_service;
mod scheduler;
mod scrape;

pub use match_service::{MatchService, DEFAULT_MATCH_LIMIT, DEFAULT_MIN_SCORE};
pub use scheduler::Scheduler;
pub use scrape::{ScrapeOrchestrator, ScrapeOutcome};
