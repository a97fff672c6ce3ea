//! Prompt builders: short system message, condense prompt, and the compact
//! grounded-answer prompt with a char budget.

use page_index::structs::index_store::SearchHit;

use crate::history::{ConversationTurn, Role};

/// Default system instructions for grounded answers.
///
/// Keep this short: it consistently improves steering without wasting tokens.
pub const DEFAULT_SYSTEM: &str = "\
You are a careful assistant answering questions about specific web pages. \
Use the provided context as ground truth; never state facts that are not \
supported by it. If the context is insufficient, say so plainly.";

/// System instruction for the condense step.
pub const CONDENSE_SYSTEM: &str = "\
You rewrite follow-up questions into standalone questions. Respond with the \
rewritten question only, no preamble.";

/// Builds the condense prompt: trailing history plus the new question.
///
/// The model resolves pronouns and ellipsis against the transcript and
/// returns a single self-contained query string.
pub fn build_condense_prompt(tail: &[ConversationTurn], question: &str) -> String {
    let mut out = String::new();
    out.push_str("Chat history:\n");
    for turn in tail {
        let who = match turn.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        out.push_str(who);
        out.push_str(": ");
        out.push_str(turn.content.trim());
        out.push('\n');
    }
    out.push_str("\nFollow-up question:\n");
    out.push_str(question.trim());
    out.push_str("\n\nStandalone question:");
    out
}

/// Build the final answer prompt with a labeled context section and char budget.
///
/// The function compacts the context into at most `max_chars`, preserving
/// the ranking order. For each hit it shows a header with the source URL,
/// then the chunk text.
pub fn build_answer_prompt(question: &str, hits: &[SearchHit], max_chars: usize) -> String {
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(question.trim());
    out.push_str("\n\n");

    if !hits.is_empty() {
        out.push_str("Context (top-ranked):\n");
        let mut budget = max_chars;

        for (i, h) in hits.iter().enumerate() {
            let header = format!("==[{}]== {} (score {:.3})\n", i + 1, h.source_url, h.score);
            let text = h.text.trim();

            // stop if we exceed budget
            if header.len() >= budget {
                break;
            }
            out.push_str(&header);
            budget -= header.len();

            let take = budget.saturating_sub(2);
            if text.len() > take {
                out.push_str(safe_truncate(text, take));
                out.push_str("\n…\n");
                break;
            } else {
                out.push_str(text);
                out.push('\n');
                budget -= text.len() + 1;
            }
        }
        out.push('\n');
        out.push_str("Answer using only the context above.\n");
    }

    out
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConversationTurn;

    fn hit(url: &str, text: &str, score: f32) -> SearchHit {
        SearchHit {
            score,
            id: "id".into(),
            source_url: url.into(),
            text: text.into(),
        }
    }

    #[test]
    fn condense_prompt_carries_history_and_question() {
        let tail = vec![
            ConversationTurn::assistant("Ask me about the page."),
            ConversationTurn::user("What does it cost in Kalasatama?"),
            ConversationTurn::assistant("Roughly X."),
        ];
        let prompt = build_condense_prompt(&tail, "what about in Töölö?");

        assert!(prompt.contains("Assistant: Ask me about the page."));
        assert!(prompt.contains("User: What does it cost in Kalasatama?"));
        assert!(prompt.contains("what about in Töölö?"));
        assert!(prompt.ends_with("Standalone question:"));
    }

    #[test]
    fn answer_prompt_respects_char_budget() {
        let hits = vec![
            hit("https://example.com/", &"a".repeat(500), 0.9),
            hit("https://example.org/", &"b".repeat(500), 0.8),
        ];
        let prompt = build_answer_prompt("How to X?", &hits, 300);

        assert!(prompt.contains("Question:"));
        assert!(prompt.contains("https://example.com/"));
        // second hit must have been dropped by the budget
        assert!(!prompt.contains("https://example.org/"));
        assert!(prompt.contains('…'));
    }

    #[test]
    fn answer_prompt_without_hits_has_no_context_block() {
        let prompt = build_answer_prompt("How to X?", &[], 1000);
        assert!(prompt.contains("Question:"));
        assert!(!prompt.contains("Context"));
    }
}
