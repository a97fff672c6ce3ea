use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use url::Url;
use uuid::Uuid;

use chat_engine::{ChatConfig, ChatEngineError, ChatSession, IndexCache};
use llm_service::LlmServiceProfiles;
use page_loader::{build_client, parse_url_list};

use crate::error_handler::{AppError, AppResult};

/// How the deployment sources its pages; the two modes are mutually
/// exclusive (`CHAT_MODE`).
pub enum ChatMode {
    /// Every session request carries its own URL list; indexes live only in
    /// the in-process cache.
    Explicit,
    /// A fixed `PAGE_URLS` set; the index is loaded from `STORAGE_DIR` when
    /// present and persisted there after the first build.
    Persistent { urls: Vec<Url>, storage_dir: PathBuf },
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Provider profiles; swapped atomically by `PUT /credential`.
    profiles: RwLock<Arc<LlmServiceProfiles>>,
    /// Live sessions. Each session sits behind its own async mutex so only
    /// one question per session is in flight.
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<ChatSession>>>>,
    /// Built indexes, memoized per URL set.
    pub cache: Mutex<IndexCache>,
    /// Ask-pipeline settings shared by every session.
    pub chat_cfg: ChatConfig,
    pub mode: ChatMode,
    /// HTTP client for page fetching.
    pub http: reqwest::Client,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// A missing `OPENAI_API_KEY` is not an error here: the server starts
    /// and surfaces configuration errors on first use (or after
    /// `PUT /credential` fixes it).
    pub fn from_env() -> AppResult<Arc<Self>> {
        let profiles = Arc::new(LlmServiceProfiles::from_env(None)?);
        let chat_cfg = ChatConfig::from_env()?;
        let mode = read_mode()?;
        let http = build_client(page_fetch_timeout_secs()?).map_err(ChatEngineError::from)?;

        Ok(Arc::new(Self {
            profiles: RwLock::new(profiles),
            sessions: Mutex::new(HashMap::new()),
            cache: Mutex::new(IndexCache::new()),
            chat_cfg,
            mode,
            http,
        }))
    }

    /// Current provider profiles snapshot.
    pub async fn profiles(&self) -> Arc<LlmServiceProfiles> {
        self.profiles.read().await.clone()
    }

    /// Replaces the provider credential at runtime, rebuilding the profiles
    /// from the environment with the new key. In-flight requests keep the
    /// snapshot they already hold.
    pub async fn set_credential(&self, api_key: &str) -> AppResult<()> {
        let rebuilt = Arc::new(LlmServiceProfiles::from_env(Some(api_key))?);
        *self.profiles.write().await = rebuilt;
        Ok(())
    }

    pub async fn insert_session(&self, session: ChatSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn session(&self, id: Uuid) -> AppResult<Arc<Mutex<ChatSession>>> {
        self.sessions
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }
}

fn read_mode() -> AppResult<ChatMode> {
    let raw = std::env::var("CHAT_MODE").unwrap_or_else(|_| "explicit".to_string());
    match raw.trim().to_ascii_lowercase().as_str() {
        "explicit" => Ok(ChatMode::Explicit),
        "persistent" => {
            let list =
                std::env::var("PAGE_URLS").map_err(|_| AppError::MissingEnv("PAGE_URLS"))?;
            let urls = parse_url_list(&list).map_err(ChatEngineError::from)?;
            let storage_dir = std::env::var("STORAGE_DIR")
                .unwrap_or_else(|_| "./storage".to_string())
                .into();
            Ok(ChatMode::Persistent { urls, storage_dir })
        }
        other => Err(ChatEngineError::Configuration(format!(
            "CHAT_MODE must be 'explicit' or 'persistent', got '{other}'"
        ))
        .into()),
    }
}

fn page_fetch_timeout_secs() -> AppResult<u64> {
    match std::env::var("PAGE_FETCH_TIMEOUT_SECS") {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map_err(|_| {
            AppError::BadRequest(format!(
                "PAGE_FETCH_TIMEOUT_SECS must be a positive integer, got '{v}'"
            ))
        }),
        _ => Ok(30),
    }
}
