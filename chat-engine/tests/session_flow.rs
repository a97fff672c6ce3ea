//! End-to-end session behavior with scripted model/embedder implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use url::Url;

use chat_engine::{ChatConfig, ChatEngineError, ChatSession, CompletionModel, Role, SessionState};
use chat_engine::{IndexCache, IndexSource};
use llm_service::{
    LlmError, LlmModelConfig, LlmServiceProfiles, ProviderError, ProviderErrorKind,
};
use page_index::errors::index_error::IndexError;
use page_index::structs::index_config::IndexConfig;
use page_index::{Embedder, VectorIndex, build_index};
use page_loader::Document;

/* --------------------- Scripted test doubles --------------------- */

/// Returns the same vector for every input, so every chunk matches every query.
struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
    }
}

/// Completion backend with canned condense/answer outputs and an optional
/// one-shot failure on the answer step.
struct ScriptedModel {
    standalone: String,
    reply: String,
    fail_next_answer: AtomicBool,
    condense_calls: AtomicUsize,
    answer_calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(standalone: &str, reply: &str) -> Self {
        Self {
            standalone: standalone.to_string(),
            reply: reply.to_string(),
            fail_next_answer: AtomicBool::new(false),
            condense_calls: AtomicUsize::new(0),
            answer_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn condense(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        self.condense_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.standalone.clone())
    }

    async fn answer(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
        self.answer_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_answer.swap(false, Ordering::SeqCst) {
            return Err(LlmError::Provider(ProviderError::new(
                ProviderErrorKind::EmptyChoices,
            )));
        }
        Ok(self.reply.clone())
    }
}

async fn example_index() -> Arc<VectorIndex> {
    let documents = vec![Document {
        source_url: Url::parse("https://example.com/").unwrap(),
        text: "Example Domain. This domain is for use in illustrative examples \
               in documents. You may use this domain in literature without \
               prior coordination or asking for permission."
            .to_string(),
    }];
    let index = build_index(&documents, &FixedEmbedder, &IndexConfig::default())
        .await
        .unwrap();
    Arc::new(index)
}

/* --------------------- Session lifecycle --------------------- */

#[tokio::test]
async fn new_session_starts_with_greeting_only() {
    let session = ChatSession::new(example_index().await, ChatConfig::default());

    assert_eq!(session.state(), SessionState::AwaitingQuestion);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().turns()[0].role, Role::Assistant);
}

#[tokio::test]
async fn each_answered_question_appends_exactly_one_exchange() {
    let model = ScriptedModel::new("What is this page about?", "This is an example domain.");
    let mut session = ChatSession::new(example_index().await, ChatConfig::default());

    let first = session
        .ask(&model, &FixedEmbedder, "What is this page about?")
        .await
        .unwrap();
    let second = session
        .ask(&model, &FixedEmbedder, "Who maintains it?")
        .await
        .unwrap();

    assert_eq!(first, "This is an example domain.");
    assert_eq!(second, "This is an example domain.");
    assert_eq!(session.state(), SessionState::AwaitingQuestion);

    // Greeting plus one user/assistant pair per answered question.
    let roles: Vec<Role> = session.history().turns().iter().map(|t| t.role).collect();
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
    // The returned answer is what lands in the transcript, verbatim.
    assert_eq!(
        session.history().turns().last().unwrap().content,
        "This is an example domain."
    );
    // Condense runs on every ask, including the very first one.
    assert_eq!(model.condense_calls.load(Ordering::SeqCst), 2);
    assert_eq!(model.answer_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_ask_leaves_history_unchanged_and_allows_retry() {
    let model = ScriptedModel::new("standalone", "recovered answer");
    model.fail_next_answer.store(true, Ordering::SeqCst);
    let mut session = ChatSession::new(example_index().await, ChatConfig::default());

    let err = session
        .ask(&model, &FixedEmbedder, "Will this fail?")
        .await
        .unwrap_err();

    assert!(matches!(err, ChatEngineError::Upstream(_)));
    assert!(err.is_retryable());
    // No partial user turn is recorded for the failed attempt.
    assert_eq!(session.history().len(), 1);
    assert!(!session.history().response_pending());
    assert_eq!(session.state(), SessionState::PendingAnswer);

    // Retrying the same question succeeds and appends exactly one exchange.
    let answer = session
        .ask(&model, &FixedEmbedder, "Will this fail?")
        .await
        .unwrap();
    assert_eq!(answer, "recovered answer");
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.state(), SessionState::AwaitingQuestion);
}

#[tokio::test]
async fn blank_question_is_a_configuration_error() {
    let model = ScriptedModel::new("ignored", "ignored");
    let mut session = ChatSession::new(example_index().await, ChatConfig::default());

    let err = session.ask(&model, &FixedEmbedder, "   ").await.unwrap_err();

    assert!(matches!(err, ChatEngineError::Configuration(_)));
    assert!(!err.is_retryable());
    assert_eq!(session.history().len(), 1);
    // A malformed question never entered the pipeline.
    assert_eq!(model.condense_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_credential_fails_before_touching_history() {
    let bare = LlmModelConfig {
        model: "gpt-3.5-turbo".to_string(),
        endpoint: "https://api.openai.com".to_string(),
        api_key: None,
        max_tokens: None,
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(5),
    };
    let profiles =
        LlmServiceProfiles::new(None, bare.clone(), bare, None).expect("profiles with no key");
    assert!(!profiles.has_credential());

    let mut session = ChatSession::new(example_index().await, ChatConfig::default());
    let err = session
        .ask(&profiles, &FixedEmbedder, "Anything?")
        .await
        .unwrap_err();

    assert!(matches!(err, ChatEngineError::Configuration(_)));
    assert_eq!(session.history().len(), 1);
}

/* --------------------- Index cache --------------------- */

/// Counts how many times the cache actually asked for a build.
struct CountingSource {
    builds: AtomicUsize,
}

impl CountingSource {
    fn new() -> Self {
        Self {
            builds: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IndexSource for CountingSource {
    async fn build(&self, urls: &[Url]) -> Result<VectorIndex, ChatEngineError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let documents: Vec<Document> = urls
            .iter()
            .map(|u| Document {
                source_url: u.clone(),
                text: format!("Synthetic page content for {u}, long enough to chunk."),
            })
            .collect();
        let index = build_index(&documents, &FixedEmbedder, &IndexConfig::default()).await?;
        Ok(index)
    }
}

#[tokio::test]
async fn cache_builds_at_most_once_per_url_set() {
    let source = CountingSource::new();
    let mut cache = IndexCache::new();
    let urls = vec![Url::parse("https://example.com/").unwrap()];

    let first = cache.get_or_build(&urls, &source).await.unwrap();
    let second = cache.get_or_build(&urls, &source).await.unwrap();

    assert_eq!(source.builds.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));

    // A different URL set is a distinct cache entry.
    let other = vec![Url::parse("https://example.org/").unwrap()];
    cache.get_or_build(&other, &source).await.unwrap();
    assert_eq!(source.builds.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn cache_refuses_an_empty_url_set() {
    let source = CountingSource::new();
    let mut cache = IndexCache::new();

    let err = cache.get_or_build(&[], &source).await.unwrap_err();

    assert!(matches!(err, ChatEngineError::Configuration(_)));
    assert_eq!(source.builds.load(Ordering::SeqCst), 0);
}
