mod client;
pub(crate) mod types;

use async_trait::async_trait;
use tracing::warn;

use crate::error::EmbeddingError;
use crate::traits::EmbeddingProvider;
use crate::util::truncate_to_char_boundary;

use client::OpenAiClient;

/// Maximum input length honoured before truncation, approximating the
/// model's ~8191 token budget at roughly one token per four characters.
pub const MAX_INPUT_CHARS: usize = 8_000;

/// Items per batched embeddings call.
pub const MAX_BATCH_SIZE: usize = 2_048;

/// `text-embedding-3-small`, 1536-dimensional output.
pub const EMBEDDING_DIMENSION: usize = 1536;

#[derive(Clone)]
pub struct OpenAiEmbeddings {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "text-embedding-3-small".to_string(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn client(&self) -> OpenAiClient {
        let client = OpenAiClient::new(&self.api_key);
        match &self.base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "embedding input is empty or whitespace".to_string(),
            ));
        }
        let truncated = truncate_to_char_boundary(text, MAX_INPUT_CHARS).to_string();
        let mut result = self.client().embed_batch(&self.model, &[truncated]).await?;
        result
            .pop()
            .ok_or_else(|| EmbeddingError::Provider("no embedding in response".to_string()))
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        // Filter blanks out before the call, then splice back by position so
        // the caller sees a result aligned 1:1 with the input.
        let mut kept_indices = Vec::with_capacity(texts.len());
        let mut kept_texts = Vec::with_capacity(texts.len());
        for (i, t) in texts.iter().enumerate() {
            if !t.trim().is_empty() {
                kept_indices.push(i);
                kept_texts.push(truncate_to_char_boundary(t, MAX_INPUT_CHARS).to_string());
            }
        }

        if kept_texts.is_empty() {
            return Ok(vec![Vec::new(); texts.len()]);
        }

        let mut results = vec![Vec::new(); texts.len()];
        for chunk_start in (0..kept_texts.len()).step_by(MAX_BATCH_SIZE) {
            let chunk_end = (chunk_start + MAX_BATCH_SIZE).min(kept_texts.len());
            let chunk = &kept_texts[chunk_start..chunk_end];

            let embeddings = self.client().embed_batch(&self.model, chunk).await?;
            if embeddings.len() != chunk.len() {
                warn!(
                    expected = chunk.len(),
                    got = embeddings.len(),
                    "OpenAI batch embedding count mismatch"
                );
            }

            for (offset, embedding) in embeddings.into_iter().enumerate() {
                let original_index = kept_indices[chunk_start + offset];
                results[original_index] = embedding;
            }
        }

        Ok(results)
    }
}
