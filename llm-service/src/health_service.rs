//! Lightweight health checks for the OpenAI backend.
//!
//! Probes `GET {endpoint}/v1/models` with Bearer auth. The returned
//! [`HealthStatus`] is JSON-serializable and suitable for a `/health`
//! endpoint. [`HealthService::check`] is resilient and never fails; errors
//! are mapped to `ok = false`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::LlmError;

/// A serializable health snapshot for a single profile config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the profile uses.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

/// A health checker that reuses a single HTTP client across probes.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`LlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }

    /// Checks health for a single profile config.
    ///
    /// This method is **resilient**: it never returns an error. Any transport
    /// or auth failure is reported through the snapshot instead.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let started = Instant::now();
        let base = cfg.endpoint.trim_end_matches('/');
        let url = format!("{base}/v1/models");

        let Some(key) = cfg.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return HealthStatus {
                endpoint: cfg.endpoint.clone(),
                model: cfg.model.clone(),
                ok: false,
                latency_ms: 0,
                message: "missing API key".into(),
            };
        };

        debug!(%url, model = %cfg.model, "health probe");

        let result = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {key}"))
            .send()
            .await;

        let latency_ms = started.elapsed().as_millis();
        match result {
            Ok(resp) if resp.status().is_success() => HealthStatus {
                endpoint: cfg.endpoint.clone(),
                model: cfg.model.clone(),
                ok: true,
                latency_ms,
                message: "reachable".into(),
            },
            Ok(resp) => {
                let status = resp.status();
                warn!(%url, %status, "health probe non-success status");
                HealthStatus {
                    endpoint: cfg.endpoint.clone(),
                    model: cfg.model.clone(),
                    ok: false,
                    latency_ms,
                    message: format!("HTTP {status}"),
                }
            }
            Err(e) => {
                warn!(%url, error = %e, "health probe transport failure");
                HealthStatus {
                    endpoint: cfg.endpoint.clone(),
                    model: cfg.model.clone(),
                    ok: false,
                    latency_ms,
                    message: format!("transport: {e}"),
                }
            }
        }
    }

    /// Checks several profile configs sequentially.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn cfg(endpoint: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            model: "gpt-3.5-turbo".into(),
            endpoint: endpoint.into(),
            api_key: key.map(str::to_string),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(2),
        }
    }

    #[tokio::test]
    async fn reachable_endpoint_reports_ok() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/models");
                then.status(200).body("{\"data\":[]}");
            })
            .await;

        let svc = HealthService::new(Some(2)).unwrap();
        let status = svc.check(&cfg(&server.base_url(), Some("k"))).await;
        assert!(status.ok);
    }

    #[tokio::test]
    async fn missing_key_reports_not_ok_without_probing() {
        let svc = HealthService::new(Some(2)).unwrap();
        let status = svc.check(&cfg("https://api.openai.com", None)).await;
        assert!(!status.ok);
        assert_eq!(status.message, "missing API key");
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/models");
                then.status(401);
            })
            .await;

        let svc = HealthService::new(Some(2)).unwrap();
        let status = svc.check(&cfg(&server.base_url(), Some("bad"))).await;
        assert!(!status.ok);
        assert!(status.message.contains("401"));
    }
}
