//! Conversation turns and the append-only history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Append-only ordered transcript.
///
/// Always starts with exactly one synthetic assistant greeting; user and
/// assistant turns are appended strictly in pairs afterwards, so a
/// well-formed history alternates `assistant, (user, assistant)*`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    /// Creates a history seeded with the greeting turn.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![ConversationTurn::assistant(greeting)],
        }
    }

    /// All turns in order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends a completed question/answer exchange.
    ///
    /// The two turns land atomically; a failed ask never touches the history.
    pub fn append_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ConversationTurn::user(question));
        self.turns.push(ConversationTurn::assistant(answer));
    }

    /// The trailing `window` turns, oldest first (for the condense prompt).
    pub fn tail(&self, window: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    /// True when the last turn is a user turn, i.e. an answer is pending.
    pub fn response_pending(&self) -> bool {
        self.turns
            .last()
            .is_some_and(|t| t.role == Role::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_starts_with_one_assistant_greeting() {
        let h = ConversationHistory::new("hello");
        assert_eq!(h.len(), 1);
        assert_eq!(h.turns()[0].role, Role::Assistant);
        assert!(!h.response_pending());
    }

    #[test]
    fn exchanges_keep_strict_alternation() {
        let mut h = ConversationHistory::new("hello");
        h.append_exchange("q1", "a1");
        h.append_exchange("q2", "a2");

        assert_eq!(h.len(), 5);
        let roles: Vec<Role> = h.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
    }

    #[test]
    fn tail_returns_trailing_window() {
        let mut h = ConversationHistory::new("hello");
        h.append_exchange("q1", "a1");
        h.append_exchange("q2", "a2");

        let tail = h.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].content, "q2");
        assert_eq!(tail[1].content, "a2");

        assert_eq!(h.tail(100).len(), 5);
    }
}
