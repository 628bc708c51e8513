//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::config::{OpenAISettings, TranscriptionSettings};
use crate::error::{RagdeskError, Result};
use crate::openai::create_client_with;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Create a transcriber from settings.
    pub fn from_settings(
        transcription: &TranscriptionSettings,
        openai: &OpenAISettings,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client_with(openai)?,
            model: transcription.model.clone(),
            language: transcription.language.clone().filter(|l| !l.is_empty()),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self, audio), fields(bytes = audio.len(), model = %self.model))]
    async fn transcribe(&self, audio: Vec<u8>, filename_hint: &str) -> Result<String> {
        if audio.is_empty() {
            return Err(RagdeskError::InvalidInput("Audio clip is empty".to_string()));
        }

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(filename_hint.to_string(), audio))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| RagdeskError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| RagdeskError::OpenAI(format!("Whisper API error: {}", e)))?;

        let text = response.text.trim().to_string();
        debug!("Transcribed {} characters", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_audio_is_rejected_locally() {
        let transcriber = WhisperTranscriber::from_settings(
            &TranscriptionSettings::default(),
            &OpenAISettings::default(),
        )
        .unwrap();

        let err = transcriber.transcribe(Vec::new(), "transcript.wav").await.unwrap_err();
        assert!(matches!(err, RagdeskError::InvalidInput(_)));
    }

    #[test]
    fn test_blank_language_is_ignored() {
        let settings = TranscriptionSettings {
            language: Some(String::new()),
            ..Default::default()
        };
        let transcriber =
            WhisperTranscriber::from_settings(&settings, &OpenAISettings::default()).unwrap();
        assert!(transcriber.language.is_none());
        assert_eq!(transcriber.model, "whisper-1");
    }
}
