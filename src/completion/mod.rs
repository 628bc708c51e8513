//! Chat completion behind a narrow trait.

mod openai;

pub use openai::OpenAICompleter;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text generation.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Generate an answer for `context` under the given system instruction.
    async fn complete(&self, system_prompt: &str, context: &str) -> Result<String>;
}
