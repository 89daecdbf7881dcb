use async_trait::async_trait;

use crate::error::EmbeddingError;

/// Provider-agnostic text-to-vector embedding service.
///
/// Implementations wrap a single upstream model. `embed_many` preserves
/// input order; empty and whitespace-only entries are filtered out before
/// the call and spliced back as empty vectors so the result stays aligned
/// with the input by position.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model_name(&self) -> &str;
    fn dimension(&self) -> usize;

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
