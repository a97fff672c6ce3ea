//! POST /sessions — builds or fetches the page index and opens a chat session.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use chat_engine::{ChatEngineError, ChatSession, IndexSource, WebIndexSource};
use llm_service::LlmServiceProfiles;
use page_index::VectorIndex;
use page_index::errors::index_error::IndexError;
use page_index::persist::{load_index, save_index};
use page_loader::parse_url_list;

use crate::{
    core::{
        app_state::{AppState, ChatMode},
        http::response_envelope::ApiResponse,
    },
    error_handler::{AppError, AppResult},
};

/// Request payload for POST /sessions.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Comma-separated page URLs. Required in explicit mode, rejected in
    /// persistent mode.
    #[serde(default)]
    pub urls: Option<String>,
}

/// Response payload for POST /sessions.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    /// The assistant turn the transcript starts with.
    pub greeting: String,
    /// URLs the backing index was built from.
    pub sources: Vec<String>,
}

/// Handler: POST /sessions
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/sessions \
///   -H 'content-type: application/json' \
///   -d '{"urls":"https://example.com"}'
/// ```
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSessionRequest>>,
) -> AppResult<Json<ApiResponse<SessionCreated>>> {
    let requested = body
        .and_then(|Json(b)| b.urls)
        .filter(|s| !s.trim().is_empty());
    let profiles = state.profiles().await;

    let index = match &state.mode {
        ChatMode::Explicit => {
            let list = requested.ok_or_else(|| {
                AppError::BadRequest("'urls' is required in explicit mode".into())
            })?;
            let urls = parse_url_list(&list).map_err(ChatEngineError::from)?;
            let source = WebIndexSource::new(
                state.http.clone(),
                profiles.clone(),
                state.chat_cfg.index.clone(),
            );
            state.cache.lock().await.get_or_build(&urls, &source).await?
        }
        ChatMode::Persistent { urls, storage_dir } => {
            if requested.is_some() {
                return Err(AppError::BadRequest(
                    "'urls' is not accepted in persistent mode; sources are fixed by PAGE_URLS"
                        .into(),
                ));
            }
            let source = PersistentSource {
                web: WebIndexSource::new(
                    state.http.clone(),
                    profiles.clone(),
                    state.chat_cfg.index.clone(),
                ),
                storage_dir: storage_dir.clone(),
            };
            state.cache.lock().await.get_or_build(urls, &source).await?
        }
    };

    let session = ChatSession::new(index.clone(), state.chat_cfg.clone());
    let session_id = state.insert_session(session).await;

    info!(
        target: "api",
        %session_id,
        sources = index.source_urls.len(),
        "session created"
    );

    Ok(Json(ApiResponse::success(SessionCreated {
        session_id,
        greeting: state.chat_cfg.greeting.clone(),
        sources: index.source_urls.clone(),
    })))
}

/// [`IndexSource`] that prefers the index persisted in `storage_dir` and
/// writes a freshly built one back there.
struct PersistentSource {
    web: WebIndexSource<LlmServiceProfiles>,
    storage_dir: PathBuf,
}

#[async_trait]
impl IndexSource for PersistentSource {
    async fn build(&self, urls: &[Url]) -> Result<VectorIndex, ChatEngineError> {
        match load_index(&self.storage_dir) {
            Ok(index) => {
                let configured: Vec<String> = urls.iter().map(|u| u.to_string()).collect();
                if index.source_urls != configured {
                    warn!(
                        target: "api",
                        dir = %self.storage_dir.display(),
                        "persisted index was built from a different URL set; serving it anyway"
                    );
                }
                info!(
                    target: "api",
                    dir = %self.storage_dir.display(),
                    chunks = index.len(),
                    "loaded persisted index"
                );
                return Ok(index);
            }
            Err(IndexError::NotPersisted(_)) => {}
            Err(e) => {
                warn!(
                    target: "api",
                    dir = %self.storage_dir.display(),
                    error = %e,
                    "persisted index unreadable; rebuilding from sources"
                );
            }
        }

        let index = self.web.build(urls).await?;
        if let Err(e) = save_index(&index, &self.storage_dir) {
            warn!(
                target: "api",
                dir = %self.storage_dir.display(),
                error = %e,
                "failed to persist freshly built index"
            );
        }
        Ok(index)
    }
}
