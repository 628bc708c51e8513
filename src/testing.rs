//! Deterministic collaborators for tests.

use crate::completion::Completer;
use crate::error::{RagdeskError, Result};
use crate::retrieval::{RetrievedDocument, Retriever};
use crate::transcription::Transcriber;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returns fixed documents and counts calls.
#[derive(Default)]
pub struct FakeRetriever {
    pub documents: Vec<String>,
    pub calls: AtomicUsize,
    pub last_k: AtomicUsize,
}

impl FakeRetriever {
    pub fn with_documents(documents: &[&str]) -> Self {
        Self {
            documents: documents.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for FakeRetriever {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_k.store(k, Ordering::SeqCst);
        Ok(self
            .documents
            .iter()
            .take(k)
            .map(|d| RetrievedDocument::new(d.clone()))
            .collect())
    }
}

/// Answers with a fixed reply (or fails) and records every context it saw.
#[derive(Default)]
pub struct FakeCompleter {
    pub reply: String,
    pub fail: bool,
    pub contexts: Mutex<Vec<(String, String)>>,
}

impl FakeCompleter {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }

    pub fn last_context(&self) -> Option<String> {
        self.contexts.lock().unwrap().last().map(|(_, c)| c.clone())
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.contexts.lock().unwrap().last().map(|(s, _)| s.clone())
    }
}

#[async_trait]
impl Completer for FakeCompleter {
    async fn complete(&self, system_prompt: &str, context: &str) -> Result<String> {
        self.contexts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), context.to_string()));
        // give other tasks a chance to interleave
        tokio::task::yield_now().await;
        if self.fail {
            return Err(RagdeskError::OpenAI("429 rate limited".to_string()));
        }
        Ok(self.reply.clone())
    }
}

/// Returns a fixed transcript and records the filename hints it received.
#[derive(Default)]
pub struct FakeTranscriber {
    pub transcript: String,
    pub hints: Mutex<Vec<(usize, String)>>,
}

impl FakeTranscriber {
    pub fn returning(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.hints.lock().unwrap().len()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, filename_hint: &str) -> Result<String> {
        self.hints
            .lock()
            .unwrap()
            .push((audio.len(), filename_hint.to_string()));
        Ok(self.transcript.clone())
    }
}
