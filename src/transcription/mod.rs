//! Speech-to-text for uploaded audio clips.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe raw audio bytes. `filename_hint` tells the service which
    /// container format to expect (e.g. `transcript.wav`).
    async fn transcribe(&self, audio: Vec<u8>, filename_hint: &str) -> Result<String>;
}
