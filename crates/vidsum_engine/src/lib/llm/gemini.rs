use reqwest::Client;
use serde::Deserialize;

use crate::{
    llm::{
        api_key_from_env, missing_credential, Provider, ProviderChoice, ProviderError,
        SYSTEM_PROMPT,
    },
    sanitizer,
};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    const API_KEY_ENV: &'static str = "GEMINI_API_KEY";
    const TEMPERATURE: f32 = 0.4;
    const MAX_OUTPUT_TOKENS: u32 = 4096;

    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://generativelanguage.googleapis.com".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        api_key_from_env(Self::API_KEY_ENV)
            .ok_or_else(|| missing_credential(ProviderChoice::Gemini))
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl Provider for GeminiProvider {
    const NAME: &'static str = "gemini";
    const MODEL: &'static str = "gemini-1.5-flash";

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        self.api_key().map(|_| ())
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;

        let body = serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_PROMPT }]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "temperature": Self::TEMPERATURE,
                "maxOutputTokens": Self::MAX_OUTPUT_TOKENS
            }
        });

        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url,
                Self::MODEL
            ))
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let response = resp.json::<GenerateContentResponse>().await?;
        let content = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::Api {
                status: 0,
                message: "no content in response".into(),
            })?;

        Ok(sanitizer::sanitize(&content))
    }
}
