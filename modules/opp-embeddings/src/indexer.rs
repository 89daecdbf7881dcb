use std::sync::Arc;

use ai_client::{EmbeddingError, EmbeddingProvider};
use opp_common::types::{Opportunity, Profile};
use opp_store::OpportunityStore;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::text::{synthesize_opportunity_text, synthesize_profile_text};

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbedStats {
    pub success: usize,
    pub skipped: usize,
    pub total: usize,
}

pub struct EmbeddingIndexer {
    provider: Arc<dyn EmbeddingProvider>,
    store: OpportunityStore,
}

impl EmbeddingIndexer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: OpportunityStore) -> Self {
        Self { provider, store }
    }

    pub async fn embed_profile(&self, profile: &Profile) -> Result<Vec<f32>, EmbeddingError> {
        let text = synthesize_profile_text(profile);
        self.provider.embed_one(&text).await
    }

    /// Embeds one opportunity. Skips the write (but not the provider call's
    /// result bookkeeping) when the freshly computed vector exactly matches
    /// what's already stored, unless `force` is set.
    pub async fn embed_opportunity(
        &self,
        opportunity: &Opportunity,
        force: bool,
    ) -> Result<bool, EmbeddingError> {
        let text = synthesize_opportunity_text(opportunity);
        let embedding = self.provider.embed_one(&text).await?;

        if !force {
            if let Some(existing) = &opportunity.embedding {
                if existing == &embedding {
                    debug!(opportunity_id = %opportunity.id, "embedding unchanged, skipping write");
                    return Ok(false);
                }
            }
        }

        self.store
            .set_embedding(opportunity.id, &embedding)
            .await
            .map_err(|e| EmbeddingError::Provider(e.to_string()))?;

        Ok(true)
    }

    /// Batched variant over many opportunities. Blank synthesized text is
    /// impossible in practice (title is always present) but the provider's
    /// `embed_many` still guards against it, so this stays order-preserving
    /// for a partially-blank input set too.
    pub async fn embed_opportunities(
        &self,
        opportunities: &[Opportunity],
        force: bool,
    ) -> Result<(Vec<Uuid>, EmbedStats), EmbeddingError> {
        let total = opportunities.len();
        let candidates: Vec<&Opportunity> = if force {
            opportunities.iter().collect()
        } else {
            opportunities
                .iter()
                .filter(|o| o.embedding.is_none())
                .collect()
        };
        let skipped_upfront = total - candidates.len();

        let texts: Vec<String> = candidates
            .iter()
            .map(|o| synthesize_opportunity_text(o))
            .collect();

        let vectors = self.provider.embed_many(&texts).await?;

        let mut embedded_ids = Vec::new();
        let mut success = 0;
        let mut skipped = skipped_upfront;

        for (opportunity, vector) in candidates.iter().zip(vectors.into_iter()) {
            if vector.is_empty() {
                warn!(opportunity_id = %opportunity.id, "no embedding produced for opportunity text");
                skipped += 1;
                continue;
            }
            if !force {
                if let Some(existing) = &opportunity.embedding {
                    if existing == &vector {
                        skipped += 1;
                        continue;
                    }
                }
            }
            self.store
                .set_embedding(opportunity.id, &vector)
                .await
                .map_err(|e| EmbeddingError::Provider(e.to_string()))?;
            embedded_ids.push(opportunity.id);
            success += 1;
        }

        Ok((
            embedded_ids,
            EmbedStats { success, skipped, total },
        ))
    }
}
