// Gemini provider - bridges the API client with the AdviceProvider trait
use async_trait::async_trait;
use shelflife_api::{GeminiClient, GeminiError};
use std::time::Duration;

use crate::{advice::AdviceProvider, config::AdviceConfig, Error, Result};

/// Wrapper around GeminiClient that implements AdviceProvider
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Build from config. `None` when there's no API key to use.
    pub fn from_config(config: &AdviceConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let client = GeminiClient::with_options(
            api_key.to_string(),
            config.api_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map_err(|e| Error::AdviceError(e.to_string()))?;

        Ok(Some(Self { client }))
    }
}

#[async_trait]
impl AdviceProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate_content(prompt)
            .await
            .map_err(gemini_to_error)
    }
}

fn gemini_to_error(err: GeminiError) -> Error {
    match err {
        GeminiError::AuthRequired => Error::ConfigError(err.to_string()),
        other => Error::AdviceError(other.to_string()),
    }
}
