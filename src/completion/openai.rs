//! OpenAI chat-completions implementation.

use super::Completer;
use crate::config::{CompletionSettings, OpenAISettings};
use crate::error::{RagdeskError, Result};
use crate::openai::create_client_with;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Completer using the OpenAI chat API.
pub struct OpenAICompleter {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAICompleter {
    /// Create a completer from settings.
    pub fn from_settings(completion: &CompletionSettings, openai: &OpenAISettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with(openai)?,
            model: completion.model.clone(),
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
        })
    }

    /// Override the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// The model requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Completer for OpenAICompleter {
    #[instrument(skip(self, system_prompt, context), fields(model = %self.model, context_len = context.len()))]
    async fn complete(&self, system_prompt: &str, context: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| RagdeskError::Completion(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(context)
                .build()
                .map_err(|e| RagdeskError::Completion(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages)
            .temperature(self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            args.max_completion_tokens(max_tokens);
        }
        let request = args
            .build()
            .map_err(|e| RagdeskError::Completion(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RagdeskError::OpenAI(format!("Failed to generate response: {}", e)))?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion token usage"
            );
        }

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| RagdeskError::Completion("Empty response from LLM".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completer_from_settings() {
        let completer =
            OpenAICompleter::from_settings(&CompletionSettings::default(), &OpenAISettings::default())
                .unwrap();
        assert_eq!(completer.model(), "gpt-4o");
        assert!((completer.temperature - 0.1).abs() < f32::EPSILON);

        let completer = completer.with_model("gpt-4o-mini");
        assert_eq!(completer.model(), "gpt-4o-mini");
    }
}
