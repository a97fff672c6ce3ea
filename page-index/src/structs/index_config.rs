//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for chunking and search.

use serde::{Deserialize, Serialize};

use crate::errors::index_error::IndexError;

/// Chunking boundaries for document splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk.
    pub max_chars: usize,
    /// Ignore ultra-short chunks below this many characters.
    pub min_chars: usize,
    /// Characters of trailing context carried into the next chunk.
    pub overlap_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            min_chars: 16,
            overlap_chars: 100,
        }
    }
}

/// Search behavior knobs (top-k, thresholds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default top-k results to return.
    pub top_k: usize,
    /// Optional minimum cosine score threshold for results.
    pub min_score: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            min_score: None,
        }
    }
}

/// Top-level runtime configuration for the index module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Chunking bounds.
    pub chunk: ChunkConfig,
    /// Search behavior settings.
    pub search: SearchConfig,
}

impl IndexConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `CHUNK_MAX_CHARS` (default: 1000)
    /// - `CHUNK_MIN_CHARS` (default: 16)
    /// - `CHUNK_OVERLAP_CHARS` (default: 100)
    /// - `RAG_TOP_K` (default: 4)
    /// - `RAG_MIN_SCORE` (optional)
    pub fn from_env() -> Result<Self, IndexError> {
        let chunk = ChunkConfig {
            max_chars: read_usize_env("CHUNK_MAX_CHARS")?.unwrap_or(1000),
            min_chars: read_usize_env("CHUNK_MIN_CHARS")?.unwrap_or(16),
            overlap_chars: read_usize_env("CHUNK_OVERLAP_CHARS")?.unwrap_or(100),
        };

        let search = SearchConfig {
            top_k: read_usize_env("RAG_TOP_K")?.unwrap_or(4),
            min_score: read_f32_env("RAG_MIN_SCORE")?,
        };

        // Basic validations
        if chunk.max_chars == 0 {
            return Err(IndexError::InvalidConfig(
                "CHUNK_MAX_CHARS must be > 0".into(),
            ));
        }
        if chunk.overlap_chars >= chunk.max_chars {
            return Err(IndexError::InvalidConfig(
                "CHUNK_OVERLAP_CHARS must be smaller than CHUNK_MAX_CHARS".into(),
            ));
        }
        if search.top_k == 0 {
            return Err(IndexError::InvalidConfig("RAG_TOP_K must be > 0".into()));
        }

        Ok(Self { chunk, search })
    }
}

/// Read an optional `usize` from env, with parse errors mapped to `IndexError`.
fn read_usize_env(key: &str) -> Result<Option<usize>, IndexError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.parse::<usize>()
                .map(Some)
                .map_err(|_| IndexError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}

/// Read an optional `f32` from env.
fn read_f32_env(key: &str) -> Result<Option<f32>, IndexError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.parse::<f32>()
                .map(Some)
                .map_err(|_| IndexError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}
