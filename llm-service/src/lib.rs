//! Shared LLM service for the page-chat backend.
//!
//! Wraps the OpenAI REST API behind a small typed surface:
//! - [`services::open_ai_service::OpenAiService`] — chat completions and embeddings
//! - [`service_profiles::LlmServiceProfiles`] — condense / answer / embedding profiles
//! - [`health_service::HealthService`] — provider reachability probe
//!
//! All errors are normalized into [`error_handler::LlmError`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{ConfigError, LlmError, ProviderError, ProviderErrorKind};
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
