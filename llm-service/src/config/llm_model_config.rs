/// Configuration for one LLM model invocation profile.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-3.5-turbo"`, `"text-embedding-ada-002"`).
/// - `endpoint`: Base API URL (e.g., `"https://api.openai.com"`).
/// - `api_key`: Provider credential; requests fail at client construction when absent.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Base API URL, without the `/v1/...` suffix.
    pub endpoint: String,

    /// Provider API key.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Returns a copy with the API key replaced.
    ///
    /// Used by the runtime credential override: the rest of the profile is
    /// kept as configured at startup.
    pub fn with_api_key(&self, api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..self.clone()
        }
    }
}
