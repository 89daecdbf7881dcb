mod error;
mod openai;
mod traits;
mod util;

pub use error::EmbeddingError;
pub use openai::{OpenAiEmbeddings, EMBEDDING_DIMENSION, MAX_BATCH_SIZE, MAX_INPUT_CHARS};
pub use traits::EmbeddingProvider;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_embeddings_reports_dimension() {
        let provider = OpenAiEmbeddings::new("sk-test");
        assert_eq!(provider.dimension(), 1536);
        assert_eq!(provider.model_name(), "text-embedding-3-small");
    }
}
