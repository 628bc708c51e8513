//! Prompt context assembly.
//!
//! The payload sent to the model is plain text:
//!
//! ```text
//! User: <oldest question>
//! Assistant: <oldest answer>
//! ...
//!
//! relevant data:
//! <document 1>
//! <document 2>
//!
//! User: <current question>
//! ```

use super::Turn;
use crate::retrieval::RetrievedDocument;

/// Label that introduces the retrieved documents.
pub const RELEVANT_DATA_LABEL: &str = "relevant data:";

/// Limits applied before the context is sent upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextBudget {
    /// Keep only the most recent N turns.
    pub max_history_turns: Option<usize>,
    /// Upper bound on the payload length in characters. The final user line
    /// is always kept, so a very long question can still exceed it.
    pub max_context_chars: Option<usize>,
}

impl ContextBudget {
    /// No limits; identical to calling [`assemble`].
    pub fn unbounded() -> Self {
        Self::default()
    }
}

fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .map(|turn| format!("User: {}\nAssistant: {}", turn.user, turn.assistant))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_documents(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt context from prior turns, retrieved documents and the
/// current input. History is rendered oldest first; documents keep the order
/// the retriever returned.
pub fn assemble(history: &[Turn], documents: &[RetrievedDocument], user_input: &str) -> String {
    format!(
        "{}\n\n{}\n{}\n\nUser: {}",
        render_history(history),
        RELEVANT_DATA_LABEL,
        render_documents(documents),
        user_input
    )
}

/// [`assemble`] under a budget.
///
/// Turns beyond `max_history_turns` are dropped oldest first. If the payload
/// is still longer than `max_context_chars`, more of the oldest turns go, then
/// trailing (least relevant) documents.
pub fn assemble_within(
    budget: ContextBudget,
    history: &[Turn],
    documents: &[RetrievedDocument],
    user_input: &str,
) -> String {
    let mut history = match budget.max_history_turns {
        Some(max) if history.len() > max => &history[history.len() - max..],
        _ => history,
    };
    let mut documents = documents;

    let Some(max_chars) = budget.max_context_chars else {
        return assemble(history, documents, user_input);
    };

    loop {
        let context = assemble(history, documents, user_input);
        if context.chars().count() <= max_chars {
            return context;
        }
        if !history.is_empty() {
            history = &history[1..];
        } else if !documents.is_empty() {
            documents = &documents[..documents.len() - 1];
        } else {
            return context;
        }
    }
}
