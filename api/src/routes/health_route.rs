//! GET /health — provider reachability snapshot.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use llm_service::HealthStatus;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

/// Response payload for /health.
#[derive(Serialize)]
pub struct HealthReport {
    /// True only when every profile is reachable.
    pub healthy: bool,
    pub profiles: Vec<HealthStatus>,
}

/// Handler: GET /health
///
/// Never fails the request; an unreachable provider is reported in the body.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<HealthReport>>> {
    let profiles = state.profiles().await.health_all().await;
    let healthy = profiles.iter().all(|p| p.ok);

    Ok(Json(ApiResponse::success(HealthReport { healthy, profiles })))
}
