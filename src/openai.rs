//! OpenAI client construction shared by every upstream call.

use crate::config::OpenAISettings;
use crate::error::{RagdeskError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client from settings.
///
/// The API key is read from `OPENAI_API_KEY` by `async_openai`; `api_base`
/// lets the client point at a compatible proxy.
pub fn create_client_with(settings: &OpenAISettings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(|e| RagdeskError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Check if the OpenAI API key is configured.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::config::Config;

    #[test]
    fn test_client_accepts_custom_base() {
        let settings = OpenAISettings {
            timeout_secs: 5,
            api_base: Some("http://localhost:8080/v1".to_string()),
        };
        let client = create_client_with(&settings).unwrap();
        assert_eq!(client.config().api_base(), "http://localhost:8080/v1");
    }
}
