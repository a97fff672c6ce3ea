//! Explicit index cache keyed by the exact ordered source URL set.
//!
//! Index construction is a paid, rate-limited operation; the cache guarantees
//! it happens at most once per distinct URL set. The build itself sits behind
//! [`IndexSource`] so tests can count invocations and production can wire the
//! loader + embedding pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use page_index::structs::index_config::IndexConfig;
use page_index::{Embedder, VectorIndex, build_index, url_set_key};

use crate::error::ChatEngineError;

/// Builds an index for a URL set on cache miss.
#[async_trait]
pub trait IndexSource: Send + Sync {
    async fn build(&self, urls: &[Url]) -> Result<VectorIndex, ChatEngineError>;
}

/// Map from URL-set key to a shared built index.
#[derive(Default)]
pub struct IndexCache {
    map: HashMap<String, Arc<VectorIndex>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached index for `urls`, building it through `source`
    /// only when absent.
    pub async fn get_or_build(
        &mut self,
        urls: &[Url],
        source: &dyn IndexSource,
    ) -> Result<Arc<VectorIndex>, ChatEngineError> {
        if urls.is_empty() {
            return Err(ChatEngineError::Configuration(
                "url set must not be empty".into(),
            ));
        }

        let key = url_set_key(urls);
        if let Some(index) = self.map.get(&key) {
            debug!(target: "chat_engine::cache", %key, "index cache hit");
            return Ok(index.clone());
        }

        info!(target: "chat_engine::cache", %key, urls = urls.len(), "index cache miss; building");
        let index = Arc::new(source.build(urls).await?);
        self.map.insert(key, index.clone());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Production [`IndexSource`]: fetch pages over HTTP, convert to text, and
/// embed through the configured provider.
pub struct WebIndexSource<E> {
    client: reqwest::Client,
    embedder: Arc<E>,
    cfg: IndexConfig,
}

impl<E: Embedder> WebIndexSource<E> {
    pub fn new(client: reqwest::Client, embedder: Arc<E>, cfg: IndexConfig) -> Self {
        Self {
            client,
            embedder,
            cfg,
        }
    }
}

#[async_trait]
impl<E: Embedder> IndexSource for WebIndexSource<E> {
    async fn build(&self, urls: &[Url]) -> Result<VectorIndex, ChatEngineError> {
        let batch = page_loader::load_pages(&self.client, urls, true).await;
        for failure in &batch.failures {
            tracing::warn!(
                target: "chat_engine::cache",
                url = %failure.url,
                error = %failure.error,
                "source url failed; indexing the successful subset"
            );
        }
        let documents = batch.into_documents()?;
        let index = build_index(&documents, self.embedder.as_ref(), &self.cfg).await?;
        Ok(index)
    }
}
