//! HTTP fetching for source pages.

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::errors::LoaderError;

/// Fetches the raw body behind `url`.
///
/// # Errors
/// - [`LoaderError::Transport`] for connect/TLS/timeout failures
/// - [`LoaderError::HttpStatus`] for non-2xx responses
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, LoaderError> {
    debug!(%url, "fetching page");

    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoaderError::HttpStatus {
            status,
            url: url.to_string(),
        });
    }

    Ok(response.text().await?)
}

/// Builds the shared HTTP client used for page loading.
///
/// # Errors
/// [`LoaderError::Transport`] if the client cannot be constructed.
pub fn build_client(timeout_secs: u64) -> Result<Client, LoaderError> {
    Ok(Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent("page-chat/0.1")
        .build()?)
}
