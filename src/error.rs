//! Error types for Ragdesk.

use thiserror::Error;

/// Library-level error type for Ragdesk operations.
#[derive(Error, Debug)]
pub enum RagdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RagdeskError {
    /// Whether the failure came from an external collaborator (model API,
    /// vector store, network) rather than from the caller's input.
    pub fn is_upstream(&self) -> bool {
        !matches!(
            self,
            RagdeskError::InvalidInput(_) | RagdeskError::Config(_)
        )
    }
}

/// Result type alias for Ragdesk operations.
pub type Result<T> = std::result::Result<T, RagdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        assert!(!RagdeskError::InvalidInput("empty".into()).is_upstream());
        assert!(!RagdeskError::Config("missing key".into()).is_upstream());
        assert!(RagdeskError::OpenAI("rate limited".into()).is_upstream());
        assert!(RagdeskError::VectorStore("locked".into()).is_upstream());
    }
}
