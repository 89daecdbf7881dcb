use thiserror::Error;

/// Error taxonomy shared across the ingestion, embedding, and ranking
/// subsystems. Variant choice drives propagation policy upstream: a
/// `SourceParseError` discards one record, a `BlockedByAntiBot` fails the
/// whole page, and so on — see each call site for the policy it applies.
#[derive(Error, Debug)]
pub enum OppError {
    #[error("transient network error: {0}")]
    TransientNetwork(String),

    #[error("failed to parse source record: {0}")]
    SourceParse(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("blocked by anti-bot challenge: {0}")]
    BlockedByAntiBot(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OppError {
    /// Whether this error should feed the circuit breaker as a failure once
    /// retries are exhausted. Anti-bot blocks count double at the
    /// call site, not here.
    pub fn feeds_breaker(&self) -> bool {
        matches!(
            self,
            OppError::TransientNetwork(_) | OppError::RateLimited(_) | OppError::BlockedByAntiBot(_)
        )
    }
}
