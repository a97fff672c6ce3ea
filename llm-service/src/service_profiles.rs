//! Shared LLM service with three active profiles: `condense`, `answer`, and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Provides convenience methods to condense, answer, and compute embeddings.
//! - If the `condense` profile is not provided, it falls back to `answer`.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::info;

use crate::{
    config::{
        default_config::{config_openai_answer, config_openai_condense, config_openai_embedding},
        llm_model_config::LlmModelConfig,
    },
    error_handler::LlmError,
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::OpenAiService,
};

/// Shared service that manages three logical LLM profiles:
/// **condense**, **answer**, and **embedding**.
///
/// Internally, it caches OpenAI clients keyed by their configuration to avoid
/// recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    condense: LlmModelConfig,
    answer: LlmModelConfig,
    embedding: LlmModelConfig,

    clients: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with three profiles.
    ///
    /// - `condense_opt`: optional condense profile. If `None`, falls back to
    ///   `answer` with temperature pinned to 0.
    /// - `answer`: required answer profile.
    /// - `embedding`: required embedding profile.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        condense_opt: Option<LlmModelConfig>,
        answer: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, LlmError> {
        let condense = condense_opt.unwrap_or_else(|| LlmModelConfig {
            temperature: Some(0.0),
            top_p: None,
            ..answer.clone()
        });

        Ok(Self {
            condense,
            answer,
            embedding,
            clients: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds all three profiles from environment variables.
    ///
    /// `api_key_override` replaces the configured `OPENAI_API_KEY` in every
    /// profile when present (the runtime credential input).
    pub fn from_env(api_key_override: Option<&str>) -> Result<Self, LlmError> {
        let mut answer = config_openai_answer()?;
        let mut condense = config_openai_condense()?;
        let mut embedding = config_openai_embedding()?;

        if let Some(key) = api_key_override.filter(|k| !k.trim().is_empty()) {
            answer = answer.with_api_key(Some(key.to_string()));
            condense = condense.with_api_key(Some(key.to_string()));
            embedding = embedding.with_api_key(Some(key.to_string()));
        }

        info!(
            answer_model = %answer.model,
            embedding_model = %embedding.model,
            key_overridden = api_key_override.is_some(),
            "LLM profiles loaded"
        );

        Self::new(Some(condense), answer, embedding, Some(10))
    }

    /// Generates text using the **condense** profile.
    ///
    /// # Errors
    /// Returns [`LlmError`] if generation fails; a missing credential surfaces
    /// as a configuration error at client construction.
    pub async fn generate_condense(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let cli = self.get_or_init(&self.condense).await?;
        cli.generate(prompt, system).await
    }

    /// Generates text using the **answer** profile.
    pub async fn generate_answer(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let cli = self.get_or_init(&self.answer).await?;
        cli.generate(prompt, system).await
    }

    /// Computes a single embedding using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let cli = self.get_or_init(&self.embedding).await?;
        cli.embeddings(input).await
    }

    /// Computes embeddings for a batch of inputs using the **embedding** profile.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let cli = self.get_or_init(&self.embedding).await?;
        cli.embeddings_batch(inputs).await
    }

    /// Returns a health snapshot for all distinct profiles.
    ///
    /// If the condense profile equals the answer profile, it is checked only once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(3);
        list.push(self.answer.clone());
        if self.condense != self.answer {
            list.push(self.condense.clone());
        }
        if self.embedding != self.answer && self.embedding != self.condense {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(condense, answer, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig, &LlmModelConfig) {
        (&self.condense, &self.answer, &self.embedding)
    }

    /// True when every profile carries a credential.
    pub fn has_credential(&self) -> bool {
        [&self.condense, &self.answer, &self.embedding]
            .iter()
            .all(|c| c.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()))
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.clients.read().await.get(&key).cloned() {
            return Ok(cli);
        }

        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        let mut w = self.clients.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }
}

/// Cache key identifying one HTTP client configuration.
#[derive(Clone, PartialEq, Eq)]
struct ClientKey {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.endpoint.hash(state);
        self.model.hash(state);
        self.api_key.hash(state);
        self.timeout_secs.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            model: model.into(),
            endpoint: "https://api.openai.com".into(),
            api_key: key.map(str::to_string),
            max_tokens: None,
            temperature: Some(0.1),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn condense_falls_back_to_answer_with_zero_temperature() {
        let svc = LlmServiceProfiles::new(
            None,
            cfg("gpt-3.5-turbo", Some("k")),
            cfg("text-embedding-ada-002", Some("k")),
            None,
        )
        .unwrap();

        let (condense, answer, _) = svc.profiles();
        assert_eq!(condense.model, answer.model);
        assert_eq!(condense.temperature, Some(0.0));
    }

    #[test]
    fn has_credential_requires_every_profile() {
        let svc = LlmServiceProfiles::new(
            None,
            cfg("gpt-3.5-turbo", Some("k")),
            cfg("text-embedding-ada-002", None),
            None,
        )
        .unwrap();
        assert!(!svc.has_credential());

        let svc = LlmServiceProfiles::new(
            None,
            cfg("gpt-3.5-turbo", Some("k")),
            cfg("text-embedding-ada-002", Some("k")),
            None,
        )
        .unwrap();
        assert!(svc.has_credential());
    }
}
