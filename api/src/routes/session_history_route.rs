//! GET /sessions/{id}/history — the ordered transcript of a session.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use chat_engine::{ConversationTurn, SessionState};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

/// Response payload for /sessions/{id}/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub state: SessionState,
    /// All turns oldest first, starting with the greeting.
    pub turns: Vec<ConversationTurn>,
}

/// Handler: GET /sessions/{id}/history
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<HistoryResponse>>> {
    let session = state.session(id).await?;
    let session = session.lock().await;

    Ok(Json(ApiResponse::success(HistoryResponse {
        session_id: id,
        state: session.state(),
        turns: session.history().turns().to_vec(),
    })))
}
