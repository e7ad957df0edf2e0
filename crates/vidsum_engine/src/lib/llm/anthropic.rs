use reqwest::Client;
use serde::Deserialize;

use crate::{
    llm::{
        api_key_from_env, missing_credential, Provider, ProviderChoice, ProviderError,
        SYSTEM_PROMPT,
    },
    sanitizer,
};

pub struct AnthropicProvider {
    client: Client,
    base_url: String,
}

impl AnthropicProvider {
    const API_KEY_ENV: &'static str = "ANTHROPIC_API_KEY";
    const API_VERSION: &'static str = "2023-06-01";
    const TEMPERATURE: f32 = 0.4;
    const MAX_OUTPUT_TOKENS: u32 = 4096;

    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.anthropic.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        api_key_from_env(Self::API_KEY_ENV)
            .ok_or_else(|| missing_credential(ProviderChoice::Anthropic))
    }
}

impl Default for AnthropicProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl Provider for AnthropicProvider {
    const NAME: &'static str = "anthropic";
    const MODEL: &'static str = "claude-3-5-haiku-latest";

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        self.api_key().map(|_| ())
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;

        let body = serde_json::json!({
            "model": Self::MODEL,
            "temperature": Self::TEMPERATURE,
            "max_tokens": Self::MAX_OUTPUT_TOKENS,
            "system": SYSTEM_PROMPT,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &api_key)
            .header("anthropic-version", Self::API_VERSION)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let response = resp.json::<MessagesResponse>().await?;
        let content = response
            .content
            .iter()
            .find_map(|block| block.text.clone())
            .ok_or_else(|| ProviderError::Api {
                status: 0,
                message: "no content in response".into(),
            })?;

        Ok(sanitizer::sanitize(&content))
    }
}
