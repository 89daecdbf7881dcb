//! Deterministic text synthesis for profiles and opportunities, plus the
//! indexer that drives an `EmbeddingProvider` and writes vectors back to
//! the opportunity store.

mod indexer;
mod text;

pub use indexer::{EmbedStats, EmbeddingIndexer};
pub use text::{synthesize_opportunity_text, synthesize_profile_text};
