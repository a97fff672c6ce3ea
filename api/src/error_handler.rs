use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use chat_engine::ChatEngineError;
use llm_service::LlmError;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    // --- Lower layers ---
    #[error(transparent)]
    Engine(#[from] ChatEngineError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,

            // user-correctable input vs provider-side failure
            AppError::Engine(ChatEngineError::Configuration(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Engine(_) => StatusCode::BAD_GATEWAY,
            AppError::Llm(e) if e.is_configuration() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            AppError::Engine(ChatEngineError::Configuration(_)) => "CONFIGURATION_ERROR",
            AppError::Engine(ChatEngineError::Loader(_)) => "LOADER_ERROR",
            AppError::Engine(ChatEngineError::Upstream(_)) => "UPSTREAM_ERROR",
            AppError::Llm(e) if e.is_configuration() => "CONFIGURATION_ERROR",
            AppError::Llm(_) => "UPSTREAM_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_map_to_unprocessable_entity() {
        let err = AppError::Engine(ChatEngineError::Configuration("no key".into()));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn upstream_errors_map_to_bad_gateway() {
        let err = AppError::Engine(ChatEngineError::Upstream("503 from provider".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn unknown_session_maps_to_not_found() {
        let err = AppError::SessionNotFound(Uuid::nil());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
