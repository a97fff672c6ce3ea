//! The embedding seam between the index and the provider.
//!
//! The builder and search paths only see [`Embedder`]; production wires in
//! [`llm_service::LlmServiceProfiles`], tests substitute deterministic mocks.

use async_trait::async_trait;
use llm_service::LlmServiceProfiles;

use crate::errors::index_error::IndexError;

/// Turns text into dense vectors for similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts, returning one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError>;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or(IndexError::ShortEmbeddingResponse { got: 0, expected: 1 })
    }
}

#[async_trait]
impl Embedder for llm_service::LlmServiceProfiles {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        let vectors = LlmServiceProfiles::embed_batch(self, texts).await?;
        if vectors.len() != texts.len() {
            return Err(IndexError::ShortEmbeddingResponse {
                got: vectors.len(),
                expected: texts.len(),
            });
        }
        Ok(vectors)
    }
}
