//! Configuration module for Ragdesk.
//!
//! Handles loading and managing application settings and prompt profiles.

mod prompts;
mod settings;

pub use prompts::{ProfilePrompt, Prompts, GLOBAL_AFFAIRS, REGISTRAR};
pub use settings::{
    CompletionSettings, EmbeddingSettings, GeneralSettings, IngestSettings, NormalizeSettings,
    OpenAISettings, PromptSettings, RagSettings, RetrievalSettings, ScriptTarget, ServerSettings,
    Settings, TranscriptionSettings, VectorStoreSettings,
};
