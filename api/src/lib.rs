//! HTTP surface: session lifecycle, asking, history, credential override,
//! and provider health.

mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use std::{env, sync::Arc};

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::routes::{
    ask_question_route::ask_question, create_session_route::create_session,
    health_route::health, session_history_route::session_history,
    set_credential_route::set_credential,
};

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;
    let state = AppState::from_env()?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(target: "api", address = %host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}/ask", post(ask_question))
        .route("/sessions/{id}/history", get(session_history))
        .route("/credential", put(set_credential))
        .route("/health", get(health))
        .with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(target: "api", error = %e, "failed to listen for shutdown signal");
    }
}
