//! The question-answering pipeline.

use super::context::{assemble_within, ContextBudget};
use super::postprocess::post_process;
use super::{ConversationStore, Turn};
use crate::completion::Completer;
use crate::config::{Prompts, RagSettings};
use crate::error::{RagdeskError, Result};
use crate::normalize::Normalizer;
use crate::retrieval::{RetrievedDocument, Retriever};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// How questions are answered: instruction, retrieval count, history blending
/// and context budget.
#[derive(Debug, Clone)]
pub struct AnswerProfile {
    pub name: String,
    pub system_prompt: String,
    /// Number of documents to retrieve.
    pub k: usize,
    /// Include prior turns in the prompt context.
    pub include_history: bool,
    pub budget: ContextBudget,
}

impl AnswerProfile {
    /// Resolve the named profile from prompts and settings.
    pub fn resolve(name: &str, prompts: &Prompts, rag: &RagSettings) -> Result<Self> {
        let prompt = prompts.profile(name).ok_or_else(|| {
            RagdeskError::Config(format!(
                "Unknown profile '{}'. Available: {}",
                name,
                Prompts::profile_names().join(", ")
            ))
        })?;

        Ok(Self {
            name: name.to_string(),
            system_prompt: prompts.render_with_custom(&prompt.system),
            k: rag.k.unwrap_or(prompt.k),
            include_history: prompt.include_history,
            budget: ContextBudget {
                max_history_turns: rag.max_history_turns,
                max_context_chars: rag.max_context_chars,
            },
        })
    }
}

/// A generated answer and the documents it was grounded on.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Cleaned, script-normalized answer text.
    pub response: String,
    pub documents: Vec<RetrievedDocument>,
}

/// Retrieval → assembly → completion → post-processing → history.
pub struct AnswerPipeline {
    retriever: Arc<dyn Retriever>,
    completer: Arc<dyn Completer>,
    normalizer: Arc<dyn Normalizer>,
    history: Arc<ConversationStore>,
    profile: AnswerProfile,
}

impl AnswerPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        completer: Arc<dyn Completer>,
        normalizer: Arc<dyn Normalizer>,
        history: Arc<ConversationStore>,
        profile: AnswerProfile,
    ) -> Self {
        Self {
            retriever,
            completer,
            normalizer,
            history,
            profile,
        }
    }

    /// The shared conversation history.
    pub fn history(&self) -> Arc<ConversationStore> {
        self.history.clone()
    }

    pub fn profile(&self) -> &AnswerProfile {
        &self.profile
    }

    /// Answer a question and record the turn.
    ///
    /// Empty input fails with [`RagdeskError::InvalidInput`] before any
    /// collaborator is called.
    #[instrument(skip(self), fields(profile = %self.profile.name))]
    pub async fn answer(&self, user_input: &str) -> Result<Answer> {
        if user_input.trim().is_empty() {
            return Err(RagdeskError::InvalidInput(
                "No user input provided".to_string(),
            ));
        }

        info!("Processing question: {}", user_input);

        let documents = self.retriever.search(user_input, self.profile.k).await?;
        debug!("Retrieved {} documents", documents.len());

        let history = if self.profile.include_history {
            self.history.all().await
        } else {
            Vec::new()
        };

        let context = assemble_within(self.profile.budget, &history, &documents, user_input);
        debug!(
            "Assembled context: {} chars, {} prior turns",
            context.chars().count(),
            history.len()
        );

        let raw = self
            .completer
            .complete(&self.profile.system_prompt, &context)
            .await?;

        let cleaned = post_process(&raw);
        let response = self.normalizer.normalize(&cleaned);

        self.history.append(Turn::new(user_input, cleaned)).await;

        Ok(Answer {
            response,
            documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Passthrough, TraditionalChinese};
    use crate::testing::{FakeCompleter, FakeRetriever};

    fn profile(include_history: bool) -> AnswerProfile {
        AnswerProfile {
            name: "test".to_string(),
            system_prompt: "You answer registrar questions.".to_string(),
            k: 3,
            include_history,
            budget: ContextBudget::unbounded(),
        }
    }

    fn pipeline(
        retriever: Arc<FakeRetriever>,
        completer: Arc<FakeCompleter>,
        include_history: bool,
    ) -> AnswerPipeline {
        AnswerPipeline::new(
            retriever,
            completer,
            Arc::new(Passthrough),
            Arc::new(ConversationStore::new()),
            profile(include_history),
        )
    }

    #[tokio::test]
    async fn test_empty_input_calls_nothing() {
        let retriever = Arc::new(FakeRetriever::with_documents(&["doc"]));
        let completer = Arc::new(FakeCompleter::replying("answer"));
        let pipeline = pipeline(retriever.clone(), completer.clone(), true);

        for input in ["", "   ", "\n\t"] {
            let err = pipeline.answer(input).await.unwrap_err();
            assert!(matches!(err, RagdeskError::InvalidInput(_)));
        }

        assert_eq!(retriever.calls(), 0);
        assert_eq!(completer.calls(), 0);
        assert!(pipeline.history().is_empty().await);
    }

    #[tokio::test]
    async fn test_answer_flow() {
        let retriever = Arc::new(FakeRetriever::with_documents(&["d1", "d2", "d3", "d4"]));
        let completer = Arc::new(FakeCompleter::replying("  line one  \n\n line two \n"));
        let pipeline = pipeline(retriever.clone(), completer.clone(), false);

        let answer = pipeline.answer("How do I withdraw?").await.unwrap();

        assert_eq!(answer.response, "line one\nline two");
        assert_eq!(answer.documents.len(), 3);
        assert_eq!(retriever.last_k.load(std::sync::atomic::Ordering::SeqCst), 3);
        assert_eq!(
            completer.last_system_prompt().unwrap(),
            "You answer registrar questions."
        );
        assert_eq!(
            completer.last_context().unwrap(),
            "\n\nrelevant data:\nd1\nd2\nd3\n\nUser: How do I withdraw?"
        );

        let turns = pipeline.history().all().await;
        assert_eq!(turns, vec![Turn::new("How do I withdraw?", "line one\nline two")]);
    }

    #[tokio::test]
    async fn test_history_blending_follows_profile() {
        let retriever = Arc::new(FakeRetriever::with_documents(&["d"]));

        let completer = Arc::new(FakeCompleter::replying("a"));
        let blended = pipeline(retriever.clone(), completer.clone(), true);
        blended.answer("first").await.unwrap();
        blended.answer("second").await.unwrap();
        assert!(completer
            .last_context()
            .unwrap()
            .starts_with("User: first\nAssistant: a\n\nrelevant data:"));

        let completer = Arc::new(FakeCompleter::replying("a"));
        let isolated = pipeline(retriever, completer.clone(), false);
        isolated.answer("first").await.unwrap();
        isolated.answer("second").await.unwrap();
        assert!(completer.last_context().unwrap().starts_with("\n\nrelevant data:"));
        // history is still recorded even when not blended
        assert_eq!(isolated.history().len().await, 2);
    }

    #[tokio::test]
    async fn test_n_calls_yield_n_turns_in_order() {
        let retriever = Arc::new(FakeRetriever::with_documents(&["d"]));
        let completer = Arc::new(FakeCompleter::replying("ok"));
        let pipeline = pipeline(retriever, completer, true);

        for i in 0..5 {
            pipeline.answer(&format!("question {}", i)).await.unwrap();
        }

        let users: Vec<_> = pipeline
            .history()
            .all()
            .await
            .into_iter()
            .map(|t| t.user)
            .collect();
        assert_eq!(
            users,
            (0..5).map(|i| format!("question {}", i)).collect::<Vec<_>>()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_questions_record_every_turn_once() {
        let retriever = Arc::new(FakeRetriever::with_documents(&["d"]));
        let completer = Arc::new(FakeCompleter::replying("ok"));
        let pipeline = Arc::new(pipeline(retriever, completer, true));

        let questions: Vec<String> = (0..32).map(|i| format!("q{}", i)).collect();
        let results = futures::future::join_all(questions.iter().map(|q| {
            let pipeline = pipeline.clone();
            let q = q.clone();
            tokio::spawn(async move { pipeline.answer(&q).await.map(|a| a.response) })
        }))
        .await;
        assert!(results.into_iter().all(|r| r.unwrap().is_ok()));

        let mut users: Vec<_> = pipeline
            .history()
            .all()
            .await
            .into_iter()
            .map(|t| t.user)
            .collect();
        assert_eq!(users.len(), 32);
        users.sort();
        let mut expected = questions.clone();
        expected.sort();
        assert_eq!(users, expected);
    }

    #[tokio::test]
    async fn test_upstream_failure_records_nothing() {
        let retriever = Arc::new(FakeRetriever::with_documents(&["d"]));
        let completer = Arc::new(FakeCompleter::failing());
        let pipeline = pipeline(retriever, completer, true);

        let err = pipeline.answer("anything").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(pipeline.history().is_empty().await);
    }

    #[tokio::test]
    async fn test_normalizes_response_but_stores_cleaned_text() {
        let pipeline = AnswerPipeline::new(
            Arc::new(FakeRetriever::default()),
            Arc::new(FakeCompleter::replying("请到教务处办理")),
            Arc::new(TraditionalChinese),
            Arc::new(ConversationStore::new()),
            profile(true),
        );

        let answer = pipeline.answer("怎么办理?").await.unwrap();
        assert_eq!(answer.response, "請到教務處辦理");
        assert_eq!(pipeline.history().all().await[0].assistant, "请到教务处办理");
    }

    #[test]
    fn test_resolve_profile() {
        let prompts = Prompts::default();
        let mut rag = RagSettings::default();

        let registrar = AnswerProfile::resolve("registrar", &prompts, &rag).unwrap();
        assert_eq!(registrar.k, 4);
        assert!(!registrar.include_history);
        assert_eq!(registrar.budget.max_history_turns, Some(20));

        rag.k = Some(2);
        let global = AnswerProfile::resolve("global_affairs", &prompts, &rag).unwrap();
        assert_eq!(global.k, 2);
        assert!(global.include_history);

        let err = AnswerProfile::resolve("bursar", &prompts, &rag).unwrap_err();
        assert!(matches!(err, RagdeskError::Config(_)));
    }
}
