use reqwest::Client;
use serde::Deserialize;

use crate::{
    llm::{
        api_key_from_env, missing_credential, Provider, ProviderChoice, ProviderError,
        SYSTEM_PROMPT,
    },
    sanitizer,
};

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
}

impl OpenAiProvider {
    const API_KEY_ENV: &'static str = "OPENAI_API_KEY";
    // fixed per backend to keep cost and output length predictable
    const TEMPERATURE: f32 = 0.4;
    const MAX_OUTPUT_TOKENS: u32 = 4096;

    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        api_key_from_env(Self::API_KEY_ENV)
            .ok_or_else(|| missing_credential(ProviderChoice::OpenAi))
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl Provider for OpenAiProvider {
    const NAME: &'static str = "openai";
    const MODEL: &'static str = "gpt-4o-mini";

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        self.api_key().map(|_| ())
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;

        let body = serde_json::json!({
            "model": Self::MODEL,
            "temperature": Self::TEMPERATURE,
            "max_tokens": Self::MAX_OUTPUT_TOKENS,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let response = resp.json::<CompletionResponse>().await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| ProviderError::Api {
                status: 0,
                message: "no content in response".into(),
            })?;

        Ok(sanitizer::sanitize(&content))
    }
}
