//! Retrieval-augmented answering.
//!
//! A question flows through retrieval, context assembly, completion,
//! post-processing and script normalization, and the resulting turn is
//! appended to the shared conversation history.

pub mod context;
mod history;
mod pipeline;
pub mod postprocess;

pub use context::{assemble, assemble_within, ContextBudget};
pub use history::{ConversationStore, Turn};
pub use pipeline::{Answer, AnswerPipeline, AnswerProfile};
pub use postprocess::post_process;
