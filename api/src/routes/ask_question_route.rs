//! POST /sessions/{id}/ask — answers a question within a session.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chat_engine::SessionState;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

/// Request payload for /sessions/{id}/ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question, possibly a follow-up to earlier turns.
    pub question: String,
}

/// Response payload for /sessions/{id}/ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Final model answer (plain text).
    pub answer: String,
    pub state: SessionState,
    /// Transcript length after this exchange.
    pub turns: usize,
}

/// Handler: POST /sessions/{id}/ask
///
/// The per-session mutex serializes questions: a second ask on the same
/// session waits for the first to finish. A failed ask keeps the transcript
/// unchanged and may be retried with the same question.
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<AskRequest>,
) -> AppResult<Json<ApiResponse<AskResponse>>> {
    let session = state.session(id).await?;
    let profiles = state.profiles().await;

    let mut session = session.lock().await;
    let answer = session
        .ask(profiles.as_ref(), profiles.as_ref(), &body.question)
        .await?;

    Ok(Json(ApiResponse::success(AskResponse {
        answer,
        state: session.state(),
        turns: session.history().len(),
    })))
}
