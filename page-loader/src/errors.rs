//! Unified error type for the page-loader crate.

use thiserror::Error;

/// Errors produced while loading source pages.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A URL string could not be parsed.
    #[error("invalid url '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure (DNS, TLS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The page yielded no text after conversion.
    #[error("no text content at {url}")]
    EmptyDocument { url: String },

    /// Every URL in the batch failed; there is nothing to index.
    #[error("all {attempted} source url(s) failed to load")]
    AllFailed { attempted: usize },

    /// The caller supplied no URLs at all.
    #[error("no source urls supplied")]
    NoSources,
}
