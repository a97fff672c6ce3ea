//! The completion seam between sessions and the provider.

use async_trait::async_trait;
use llm_service::{LlmError, LlmServiceProfiles};

/// Chat-completion backend used by the session pipeline.
///
/// Production wires in [`LlmServiceProfiles`]; tests substitute scripted
/// implementations.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Rewrites a follow-up question into a standalone query.
    async fn condense(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    /// Generates the grounded answer.
    async fn answer(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;
}

#[async_trait]
impl CompletionModel for LlmServiceProfiles {
    async fn condense(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        self.generate_condense(prompt, system).await
    }

    async fn answer(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        self.generate_answer(prompt, system).await
    }
}
