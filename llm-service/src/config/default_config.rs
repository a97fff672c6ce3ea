//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by role:
//!
//! - **Condense**   → rewrites a follow-up question into a standalone query
//! - **Answer**     → generates the grounded answer
//! - **Embedding**  → embeds chunks and queries for similarity search
//!
//! # Environment variables
//!
//! Common:
//! - `OPENAI_URL`      = base API URL (default `https://api.openai.com`)
//! - `OPENAI_API_KEY`  = provider credential (optional here; required at call time)
//! - `LLM_MAX_TOKENS`  = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`= optional request timeout (u64)
//!
//! Role-specific:
//! - `LLM_MODEL`       = completion model (default `gpt-3.5-turbo`)
//! - `LLM_TEMPERATURE` = answer sampling temperature (default `0.1`)
//! - `EMBEDDING_MODEL` = embedding model (default `text-embedding-ada-002`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{LlmError, env_opt_f32, env_opt_u32, env_opt_u64},
};

/// Resolves the OpenAI endpoint from the environment.
fn openai_endpoint() -> String {
    std::env::var("OPENAI_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "https://api.openai.com".to_string())
}

/// Reads the provider credential from the environment, if present.
fn openai_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Constructs the config for the **answer** profile.
///
/// # Defaults
/// - `temperature = 0.1` (low creativity; answers must stay on the sources)
/// - `timeout_secs = 60`
pub fn config_openai_answer() -> Result<LlmModelConfig, LlmError> {
    let model =
        std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(0.1);
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60);

    Ok(LlmModelConfig {
        model,
        endpoint: openai_endpoint(),
        api_key: openai_api_key(),
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Constructs the config for the **condense** profile.
///
/// Uses the same completion model as the answer profile but pinned to
/// `temperature = 0.0`: question rewriting must be deterministic.
pub fn config_openai_condense() -> Result<LlmModelConfig, LlmError> {
    let answer = config_openai_answer()?;

    Ok(LlmModelConfig {
        temperature: Some(0.0),
        top_p: None,
        ..answer
    })
}

/// Constructs the config for the **embedding** profile.
///
/// # Defaults
/// - `model = text-embedding-ada-002`
/// - `timeout_secs = 60`
pub fn config_openai_embedding() -> Result<LlmModelConfig, LlmError> {
    let model = std::env::var("EMBEDDING_MODEL")
        .unwrap_or_else(|_| "text-embedding-ada-002".to_string());
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60);

    Ok(LlmModelConfig {
        model,
        endpoint: openai_endpoint(),
        api_key: openai_api_key(),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}
