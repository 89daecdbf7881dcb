use thiserror::Error;

/// Error taxonomy surfaced by embedding providers.
///
/// `InvalidInput` is a caller error (empty or whitespace-only text) and is
/// never retried. `ProviderError` covers transport failures and non-2xx
/// responses from the upstream service.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("invalid embedding input: {0}")]
    InvalidInput(String),

    #[error("embedding provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(e: reqwest::Error) -> Self {
        EmbeddingError::Provider(e.to_string())
    }
}
