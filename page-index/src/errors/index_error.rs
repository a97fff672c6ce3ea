//! Unified error type for the page-index crate.

use thiserror::Error;

/// Errors produced by the index builder and search paths.
#[derive(Debug, Error)]
pub enum IndexError {
    // --- Configuration / environment ---
    /// The document list was empty; an index must never be built from zero sources.
    #[error("cannot build an index from an empty document list")]
    EmptyDocuments,

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // --- Embeddings backend ---
    /// The embedding provider failed; carries the provider-side error.
    #[error("embedding provider error: {0}")]
    Llm(#[from] llm_service::LlmError),

    /// Embedding vectors disagreed on dimensionality.
    #[error("embedding dimension mismatch: got {got}, expected {expected}")]
    DimMismatch { got: usize, expected: usize },

    /// The provider returned fewer vectors than inputs.
    #[error("embedding response incomplete: {got} vectors for {expected} inputs")]
    ShortEmbeddingResponse { got: usize, expected: usize },

    // --- Persistence ---
    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// No persisted index exists at the given location.
    #[error("no persisted index found at {0}")]
    NotPersisted(String),
}

impl IndexError {
    /// True when the failure is user-correctable configuration rather than a
    /// transient upstream condition.
    pub fn is_configuration(&self) -> bool {
        match self {
            IndexError::EmptyDocuments
            | IndexError::EnvParse { .. }
            | IndexError::InvalidConfig(_) => true,
            IndexError::Llm(e) => e.is_configuration(),
            _ => false,
        }
    }
}
