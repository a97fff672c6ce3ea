//! Environment-driven configuration for chat sessions.

use page_index::structs::index_config::IndexConfig;

use crate::error::ChatEngineError;

/// Default greeting used when `GREETING_MESSAGE` is unset.
pub const DEFAULT_GREETING: &str =
    "Hi! Ask me a question about the loaded pages and I will answer from their content.";

/// Runtime knobs for the ask pipeline.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Synthetic assistant turn every history starts with.
    pub greeting: String,
    /// How many trailing turns feed the condense prompt.
    pub history_window: usize,
    /// Char budget for the grounded-context block.
    pub context_max_chars: usize,
    /// Chunking/search settings forwarded to the index layer.
    pub index: IndexConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            history_window: 8,
            context_max_chars: 6000,
            index: IndexConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `GREETING_MESSAGE` (default: built-in greeting)
    /// - `HISTORY_WINDOW` (default: 8)
    /// - `CONTEXT_MAX_CHARS` (default: 6000)
    /// - plus everything `IndexConfig::from_env` reads.
    pub fn from_env() -> Result<Self, ChatEngineError> {
        let greeting = std::env::var("GREETING_MESSAGE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());

        let history_window = read_usize("HISTORY_WINDOW")?.unwrap_or(8);
        let context_max_chars = read_usize("CONTEXT_MAX_CHARS")?.unwrap_or(6000);

        if history_window == 0 {
            return Err(ChatEngineError::Configuration(
                "HISTORY_WINDOW must be > 0".into(),
            ));
        }

        Ok(Self {
            greeting,
            history_window,
            context_max_chars,
            index: IndexConfig::from_env()?,
        })
    }
}

fn read_usize(key: &'static str) -> Result<Option<usize>, ChatEngineError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.parse::<usize>().map(Some).map_err(|_| {
            ChatEngineError::Configuration(format!("{key} must be a positive integer, got '{v}'"))
        }),
        _ => Ok(None),
    }
}
