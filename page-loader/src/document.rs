//! Loaded-document types shared with the index builder.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::LoaderError;

/// A unit of loaded text with its source identifier.
///
/// Immutable once loaded; the index builder only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Where the text came from.
    pub source_url: Url,
    /// Plain text content.
    pub text: String,
}

/// Per-URL failure record inside a batch.
#[derive(Debug)]
pub struct UrlFailure {
    pub url: String,
    pub error: LoaderError,
}

/// Outcome of loading a batch of URLs.
///
/// A single failed URL does not abort the batch; failures are carried
/// alongside the successfully loaded documents so callers can surface them.
#[derive(Debug, Default)]
pub struct PageBatch {
    pub documents: Vec<Document>,
    pub failures: Vec<UrlFailure>,
}

impl PageBatch {
    /// Consumes the batch, returning the loaded documents.
    ///
    /// # Errors
    /// [`LoaderError::AllFailed`] when every URL in the batch failed; an index
    /// must never be built from zero sources.
    pub fn into_documents(self) -> Result<Vec<Document>, LoaderError> {
        if self.documents.is_empty() {
            return Err(LoaderError::AllFailed {
                attempted: self.failures.len(),
            });
        }
        Ok(self.documents)
    }
}
