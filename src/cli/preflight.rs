//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail on the first upstream call.

use crate::config::Settings;
use crate::error::{RagdeskError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving needs the API key and a usable data directory.
    Serve,
    /// Ingestion calls the embedding API.
    Ingest,
    /// Answering calls the embedding and chat APIs.
    Ask,
    /// Transcription calls the speech-to-text API.
    Transcribe,
    /// Listing only reads the local store.
    List,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Serve => {
            check_api_key()?;
            check_data_dir(settings)?;
        }
        Operation::Ingest | Operation::Ask | Operation::Transcribe => {
            check_api_key()?;
        }
        Operation::List => {}
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(RagdeskError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(RagdeskError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...' (or add it to .env)"
                .to_string(),
        )),
    }
}

/// Check that the data directory exists or can be created.
fn check_data_dir(settings: &Settings) -> Result<()> {
    let dir = settings.data_dir();
    std::fs::create_dir_all(&dir).map_err(|e| {
        RagdeskError::Config(format!(
            "Data directory {} is not writable: {}",
            dir.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_list_no_requirements() {
        assert!(check(Operation::List, &Settings::default()).is_ok());
    }

    #[test]
    fn test_check_data_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.data_dir = dir.path().join("nested").display().to_string();
        check_data_dir(&settings).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
