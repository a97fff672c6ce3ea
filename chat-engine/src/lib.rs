//! Condense-question chat sessions over a page index.
//!
//! Public API: [`ChatSession::ask`]. Each ask condenses the follow-up
//! question against the trailing history, retrieves top-K grounding context
//! from the index, and generates an answer constrained to that context.
//! [`IndexCache`] guarantees index construction happens at most once per
//! distinct source URL set.

pub mod cfg;
pub mod error;
pub mod history;
pub mod index_cache;
pub mod model;
pub mod prompt;
pub mod session;

pub use cfg::ChatConfig;
pub use error::ChatEngineError;
pub use history::{ConversationHistory, ConversationTurn, Role};
pub use index_cache::{IndexCache, IndexSource, WebIndexSource};
pub use model::CompletionModel;
pub use session::{ChatSession, SessionState};
