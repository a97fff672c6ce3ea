//! Error taxonomy for the chat engine.
//!
//! Three families, matching what a caller can do about them:
//! - `Configuration` — user-correctable (missing credential, empty sources,
//!   asking before an index exists); not retryable without changed input.
//! - `Upstream` — provider transport/HTTP/decode failure; retryable by
//!   re-submitting the same question.
//! - `Loader` — a source URL could not be fetched or parsed.

use thiserror::Error;

/// Errors surfaced by chat sessions and the index cache.
#[derive(Debug, Error)]
pub enum ChatEngineError {
    /// User-correctable configuration problem.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Provider-side failure; safe to retry with the same question.
    #[error("upstream provider error: {0}")]
    Upstream(String),

    /// Source page loading failure.
    #[error(transparent)]
    Loader(#[from] page_loader::LoaderError),
}

impl ChatEngineError {
    /// True when re-submitting the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatEngineError::Upstream(_) | ChatEngineError::Loader(_))
    }
}

impl From<llm_service::LlmError> for ChatEngineError {
    fn from(e: llm_service::LlmError) -> Self {
        if e.is_configuration() {
            ChatEngineError::Configuration(e.to_string())
        } else {
            ChatEngineError::Upstream(e.to_string())
        }
    }
}

impl From<page_index::errors::index_error::IndexError> for ChatEngineError {
    fn from(e: page_index::errors::index_error::IndexError) -> Self {
        if e.is_configuration() {
            ChatEngineError::Configuration(e.to_string())
        } else {
            ChatEngineError::Upstream(e.to_string())
        }
    }
}
