use std::path::Path;

use reqwest::Client;
use serde::Deserialize;

use crate::{
    llm::api_key_from_env,
    transcript::{AcquisitionError, SpeechToText},
};

/// OpenAI speech-to-text client. Uploads one prepared audio file per call.
pub struct WhisperClient {
    client: Client,
    base_url: String,
}

impl WhisperClient {
    const MODEL: &'static str = "whisper-1";
    const API_KEY_ENV: &'static str = "OPENAI_API_KEY";

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

    fn api_key(&self) -> Option<String> {
        api_key_from_env(Self::API_KEY_ENV)
    }
}

impl Default for WhisperClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: String,
}

impl SpeechToText for WhisperClient {
    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    #[tracing::instrument(skip(self))]
    async fn transcribe(&self, audio: &Path) -> Result<String, AcquisitionError> {
        let api_key = self
            .api_key()
            .ok_or(AcquisitionError::SpeechToTextUnavailable)?;

        let bytes = tokio::fs::read(audio).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("audio.flac")
            .mime_str("audio/flac")
            .map_err(|e| AcquisitionError::SpeechToText(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("model", Self::MODEL)
            .text("response_format", "json")
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&api_key)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))
            .map_err(|e| AcquisitionError::SpeechToText(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(AcquisitionError::SpeechToText(format!(
                "{status} - {message}"
            )));
        }

        let response = resp
            .json::<TranscribeResponse>()
            .await
            .map_err(|e| AcquisitionError::SpeechToText(e.to_string()))?;

        Ok(response.text)
    }
}
