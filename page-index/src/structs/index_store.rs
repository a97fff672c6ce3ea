//! Data types for the vector index: chunk payloads, search hits, and
//! indexing statistics.

use serde::{Deserialize, Serialize};

/// Minimal payload stored alongside each embedded chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Unique chunk id (`<content-hash>:<position>`).
    pub id: String,
    /// Source page URL.
    pub source_url: String,
    /// Zero-based chunk position within the source document.
    pub position: usize,
    /// Chunk text (also the grounding context shown to the model).
    pub text: String,
    /// blake3 hash of the chunk text; identical chunks collapse on merge.
    pub content_hash: String,
}

/// A single semantic search hit (ranked by similarity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub id: String,
    pub source_url: String,
    pub text: String,
}

/// Summary statistics for a full index build.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IndexStats {
    pub indexed: usize,
    pub skipped: usize,
    pub duration_ms: u128,
}
