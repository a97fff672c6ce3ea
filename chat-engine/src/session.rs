//! Chat sessions: one index, one history, one question in flight.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use page_index::{Embedder, VectorIndex, search_top_k};

use crate::cfg::ChatConfig;
use crate::error::ChatEngineError;
use crate::history::ConversationHistory;
use crate::model::CompletionModel;
use crate::prompt::{CONDENSE_SYSTEM, DEFAULT_SYSTEM, build_answer_prompt, build_condense_prompt};

/// Session lifecycle; see [`ChatSession::ask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready to accept a new question.
    AwaitingQuestion,
    /// A question was submitted and has not been answered yet. A failed ask
    /// stays here so the caller can retry the same question.
    PendingAnswer,
}

/// One chat session over one built index.
///
/// Owns the conversation history exclusively; the index is shared read-only.
/// Exactly one question is processed at a time; the caller serializes access.
pub struct ChatSession {
    index: Arc<VectorIndex>,
    history: ConversationHistory,
    state: SessionState,
    cfg: ChatConfig,
}

impl ChatSession {
    /// Creates a session seeded with the greeting turn.
    pub fn new(index: Arc<VectorIndex>, cfg: ChatConfig) -> Self {
        let history = ConversationHistory::new(cfg.greeting.clone());
        Self {
            index,
            history,
            state: SessionState::AwaitingQuestion,
            cfg,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Answers `question` with condense-question retrieval-augmented generation.
    ///
    /// Pipeline:
    /// 1. condense: trailing history + question → standalone query (one
    ///    completion call, always performed);
    /// 2. retrieve: embed the standalone query, top-k similarity search;
    /// 3. generate: grounded prompt + system instruction → answer.
    ///
    /// On success the `user`/`assistant` pair is appended and the session
    /// returns to [`SessionState::AwaitingQuestion`]. On failure the history
    /// is untouched and the state stays [`SessionState::PendingAnswer`]; the
    /// caller surfaces the error and may re-ask the same question. Nothing is
    /// retried internally.
    pub async fn ask(
        &mut self,
        model: &dyn CompletionModel,
        embedder: &dyn Embedder,
        question: &str,
    ) -> Result<String, ChatEngineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatEngineError::Configuration(
                "question must not be empty".into(),
            ));
        }

        self.state = SessionState::PendingAnswer;

        // 1) Condense the follow-up into a standalone query.
        let condense_prompt =
            build_condense_prompt(self.history.tail(self.cfg.history_window), question);
        let standalone = model
            .condense(&condense_prompt, Some(CONDENSE_SYSTEM))
            .await
            .map_err(|e| {
                warn!(target: "chat_engine", error = %e, "condense step failed");
                ChatEngineError::from(e)
            })?;
        let standalone = standalone.trim().to_string();

        debug!(
            target: "chat_engine",
            question_len = question.len(),
            standalone_len = standalone.len(),
            "condensed question"
        );

        // 2) Retrieve grounding context for the standalone query.
        let hits = search_top_k(&self.index, embedder, &standalone, None, &self.cfg.index)
            .await
            .map_err(|e| {
                warn!(target: "chat_engine", error = %e, "retrieval step failed");
                ChatEngineError::from(e)
            })?;

        // 3) Generate the grounded answer.
        let answer_prompt =
            build_answer_prompt(&standalone, &hits, self.cfg.context_max_chars);
        let answer = model
            .answer(&answer_prompt, Some(DEFAULT_SYSTEM))
            .await
            .map_err(|e| {
                warn!(target: "chat_engine", error = %e, "generation step failed");
                ChatEngineError::from(e)
            })?;

        self.history.append_exchange(question, answer.clone());
        self.state = SessionState::AwaitingQuestion;

        info!(
            target: "chat_engine",
            turns = self.history.len(),
            context_hits = hits.len(),
            "question answered"
        );

        Ok(answer)
    }
}
