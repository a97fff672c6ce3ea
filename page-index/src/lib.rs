//! Public API:
//! - `build_index`: chunk documents, embed chunks, assemble the vector index.
//! - `search_top_k`: embed query, cosine search (wide), lexical rerank, truncate.
//! - `persist`: JSON save/load of a built index for the persistent mode.

mod chunker;
mod embedder;
pub mod errors;
pub mod persist;
pub mod structs;
mod vector_index;

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tracing::{debug, info};
use url::Url;

use chunker::split_into_chunks;
pub use embedder::Embedder;
use errors::index_error::IndexError;
use structs::index_config::IndexConfig;
use structs::index_store::{ChunkPayload, IndexStats, SearchHit};
pub use vector_index::{IndexedChunk, VectorIndex, cosine_similarity};

/// Size of one embedding request batch.
const EMBED_BATCH: usize = 64;

/// Returns the cache/persistence key for an exact ordered URL list.
///
/// Any change in content, order, or count produces a different key.
pub fn url_set_key(urls: &[Url]) -> String {
    let mut hasher = blake3::Hasher::new();
    for url in urls {
        hasher.update(url.as_str().as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

/// Builds a fresh index over `documents`.
///
/// Splits each document into chunks, drops duplicates by content hash, embeds
/// chunk batches through `embedder`, and validates that every vector shares
/// one dimensionality.
///
/// This performs paid provider calls; callers are expected to build at most
/// once per distinct source set and reuse the result (see the chat engine's
/// index cache).
///
/// # Errors
/// - [`IndexError::EmptyDocuments`] for an empty document list
/// - [`IndexError::InvalidConfig`] when chunking produced nothing to index
/// - [`IndexError::Llm`] / [`IndexError::DimMismatch`] from the embedding step
pub async fn build_index(
    documents: &[page_loader::Document],
    embedder: &dyn Embedder,
    cfg: &IndexConfig,
) -> Result<VectorIndex, IndexError> {
    if documents.is_empty() {
        return Err(IndexError::EmptyDocuments);
    }

    let source_urls: Vec<Url> = documents.iter().map(|d| d.source_url.clone()).collect();
    let source_key = url_set_key(&source_urls);

    info!(
        target: "page_index::build",
        documents = documents.len(),
        source_key = %source_key,
        "build_index: start"
    );

    let started = Instant::now();

    // Chunk every document, deduplicating identical text across sources.
    let mut payloads: Vec<ChunkPayload> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = 0usize;

    for doc in documents {
        for (position, text) in split_into_chunks(&doc.text, &cfg.chunk).into_iter().enumerate() {
            let content_hash = blake3::hash(text.as_bytes()).to_hex().to_string();
            if !seen.insert(content_hash.clone()) {
                skipped += 1;
                continue;
            }
            payloads.push(ChunkPayload {
                id: format!("{content_hash}:{position}"),
                source_url: doc.source_url.to_string(),
                position,
                text,
                content_hash,
            });
        }
    }

    if payloads.is_empty() {
        return Err(IndexError::InvalidConfig(
            "documents produced no indexable chunks".into(),
        ));
    }

    // Embed in batches.
    let mut chunks: Vec<IndexedChunk> = Vec::with_capacity(payloads.len());
    let mut dim: Option<usize> = None;

    for batch in payloads.chunks(EMBED_BATCH) {
        let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != batch.len() {
            return Err(IndexError::ShortEmbeddingResponse {
                got: vectors.len(),
                expected: batch.len(),
            });
        }

        for (payload, vector) in batch.iter().cloned().zip(vectors.into_iter()) {
            match dim {
                None => dim = Some(vector.len()),
                Some(expected) if vector.len() != expected => {
                    return Err(IndexError::DimMismatch {
                        got: vector.len(),
                        expected,
                    });
                }
                _ => {}
            }
            chunks.push(IndexedChunk { payload, vector });
        }
    }

    let stats = IndexStats {
        indexed: chunks.len(),
        skipped,
        duration_ms: started.elapsed().as_millis(),
    };

    info!(
        target: "page_index::build",
        indexed = stats.indexed,
        skipped = stats.skipped,
        duration_ms = stats.duration_ms,
        "build_index: finished"
    );

    Ok(VectorIndex::new(
        dim.unwrap_or(0),
        source_key,
        source_urls.iter().map(|u| u.to_string()).collect(),
        stats,
        chunks,
    ))
}

/// Performs semantic search (top-k) with lexical re-ranking.
///
/// The vector search runs wide (4×k) before re-ranking so lexical matches
/// just below the cosine cut still have a chance to surface.
pub async fn search_top_k(
    index: &VectorIndex,
    embedder: &dyn Embedder,
    query: &str,
    k: Option<usize>,
    cfg: &IndexConfig,
) -> Result<Vec<SearchHit>, IndexError> {
    let query_vec = embedder.embed(query).await?;
    let want = k.unwrap_or(cfg.search.top_k);

    let wide = want.saturating_mul(4).max(want);
    let mut hits = index.search_vector(&query_vec, wide, cfg.search.min_score);
    lexical_rerank(query, &mut hits);
    hits.truncate(want);

    debug!(
        target: "page_index::search",
        query_len = query.len(),
        hits = hits.len(),
        "search_top_k: done"
    );

    Ok(hits)
}

/// Lexical re-ranking with IDF-like token boosts and a raw-substring bonus.
fn lexical_rerank(query: &str, hits: &mut [SearchHit]) {
    let q = query.to_lowercase();

    let tokens: Vec<String> = q
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.len() >= 2)
        .map(|s| s.to_string())
        .collect();

    let haystacks: Vec<String> = hits.iter().map(|h| h.text.to_lowercase()).collect();

    // document frequency for tokens across all haystacks
    let mut df = HashMap::<String, usize>::new();
    for hay in &haystacks {
        for t in &tokens {
            if hay.contains(t.as_str()) {
                *df.entry(t.clone()).or_insert(0) += 1;
            }
        }
    }
    let n_docs = haystacks.len().max(1) as f32;

    let w_token_base = 0.10_f32;
    let w_full = 0.40_f32;

    let mut scored: Vec<(f32, usize)> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let hay = &haystacks[i];
            let mut boost = 0.0f32;

            for t in &tokens {
                if hay.contains(t.as_str()) {
                    let dfi = *df.get(t).unwrap_or(&1) as f32;
                    let idf = 1.0 + (1.0 + n_docs / dfi).ln();
                    boost += w_token_base * idf;
                }
            }

            if q.len() >= 4 && hay.contains(&q) {
                boost += w_full;
            }

            (hit.score + boost, i)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let reordered: Vec<SearchHit> = scored.iter().map(|&(_, i)| hits[i].clone()).collect();
    hits.clone_from_slice(&reordered);
}
