//! Content loader: turns a list of URLs into plain-text [`Document`]s.
//!
//! Public API:
//! - [`parse_url_list`]: split and validate a comma-separated URL string.
//! - [`load_pages`]: fetch every URL, convert HTML to text, and report
//!   per-URL failures without aborting the batch.

mod document;
pub mod errors;
mod extract;
mod fetch;

use reqwest::Client;
use tracing::{info, warn};
use url::Url;

pub use document::{Document, PageBatch, UrlFailure};
pub use errors::LoaderError;
pub use extract::html_to_text;
pub use fetch::{build_client, fetch_page};

/// Parses a comma-separated URL list (the presentation-layer input format).
///
/// Empty segments are skipped; whitespace around each entry is trimmed.
///
/// # Errors
/// - [`LoaderError::NoSources`] when the string holds no URLs at all
/// - [`LoaderError::InvalidUrl`] on the first entry that fails to parse
pub fn parse_url_list(input: &str) -> Result<Vec<Url>, LoaderError> {
    let mut urls = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let url = Url::parse(part).map_err(|source| LoaderError::InvalidUrl {
            input: part.to_string(),
            source,
        })?;
        urls.push(url);
    }

    if urls.is_empty() {
        return Err(LoaderError::NoSources);
    }
    Ok(urls)
}

/// Loads every URL in order and converts each page to a [`Document`].
///
/// A failed URL is recorded in [`PageBatch::failures`] and the batch
/// continues; callers decide whether a partial batch is acceptable via
/// [`PageBatch::into_documents`].
///
/// When `html_to_text` is false the raw body is kept verbatim (useful for
/// plain-text sources).
pub async fn load_pages(client: &Client, urls: &[Url], html_to_text_flag: bool) -> PageBatch {
    let mut batch = PageBatch::default();

    for url in urls {
        match load_one(client, url, html_to_text_flag).await {
            Ok(doc) => {
                info!(
                    target: "page_loader",
                    url = %url,
                    chars = doc.text.len(),
                    "page loaded"
                );
                batch.documents.push(doc);
            }
            Err(error) => {
                warn!(
                    target: "page_loader",
                    url = %url,
                    error = %error,
                    "page load failed; continuing with remaining urls"
                );
                batch.failures.push(UrlFailure {
                    url: url.to_string(),
                    error,
                });
            }
        }
    }

    batch
}

async fn load_one(
    client: &Client,
    url: &Url,
    html_to_text_flag: bool,
) -> Result<Document, LoaderError> {
    let body = fetch_page(client, url).await?;
    let text = if html_to_text_flag {
        html_to_text(&body)
    } else {
        body.trim().to_string()
    };

    if text.is_empty() {
        return Err(LoaderError::EmptyDocument {
            url: url.to_string(),
        });
    }

    Ok(Document {
        source_url: url.clone(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn url_list_parses_and_trims() {
        let urls = parse_url_list(" https://example.com , https://example.org/page ,").unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].as_str(), "https://example.com/");
    }

    #[test]
    fn empty_url_list_is_rejected() {
        assert!(matches!(parse_url_list("  ,  "), Err(LoaderError::NoSources)));
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(matches!(
            parse_url_list("not a url"),
            Err(LoaderError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn one_failed_url_does_not_poison_the_batch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/good");
                then.status(200)
                    .body("<html><body><p>Example Domain</p></body></html>");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/bad");
                then.status(404);
            })
            .await;

        let urls = vec![
            Url::parse(&format!("{}/good", server.base_url())).unwrap(),
            Url::parse(&format!("{}/bad", server.base_url())).unwrap(),
        ];

        let client = build_client(5).unwrap();
        let batch = load_pages(&client, &urls, true).await;

        assert_eq!(batch.documents.len(), 1);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.documents[0].text, "Example Domain");
        assert!(matches!(
            batch.failures[0].error,
            LoaderError::HttpStatus { .. }
        ));

        let docs = batch.into_documents().unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn all_failed_batch_errors_on_into_documents() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/bad");
                then.status(500);
            })
            .await;

        let urls = vec![Url::parse(&format!("{}/bad", server.base_url())).unwrap()];
        let client = build_client(5).unwrap();
        let batch = load_pages(&client, &urls, true).await;

        assert!(matches!(
            batch.into_documents(),
            Err(LoaderError::AllFailed { attempted: 1 })
        ));
    }

    #[tokio::test]
    async fn raw_mode_keeps_body_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/plain");
                then.status(200).body("line one\nline two");
            })
            .await;

        let urls = vec![Url::parse(&format!("{}/plain", server.base_url())).unwrap()];
        let client = build_client(5).unwrap();
        let batch = load_pages(&client, &urls, false).await;
        assert_eq!(batch.documents[0].text, "line one\nline two");
    }
}
