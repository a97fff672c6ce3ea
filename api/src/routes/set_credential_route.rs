//! PUT /credential — runtime override of the provider API key.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
};

/// Request payload for /credential.
#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

/// Response payload for /credential.
#[derive(Debug, Serialize)]
pub struct CredentialUpdated {
    pub has_credential: bool,
}

/// Handler: PUT /credential
///
/// Rebuilds the provider profiles with the new key. Sessions created before
/// the change pick it up on their next ask; requests already in flight keep
/// the old one.
pub async fn set_credential(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialRequest>,
) -> AppResult<Json<ApiResponse<CredentialUpdated>>> {
    if body.api_key.trim().is_empty() {
        return Err(AppError::BadRequest("'api_key' must not be empty".into()));
    }

    state.set_credential(body.api_key.trim()).await?;
    info!(target: "api", "provider credential updated");

    Ok(Json(ApiResponse::success(CredentialUpdated {
        has_credential: state.profiles().await.has_credential(),
    })))
}
