use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use vidsum_engine::{Provider, ProviderError};

#[derive(Clone)]
pub struct MockProvider {
    pub reply: String,
    pub scripted: Arc<Mutex<VecDeque<String>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_on_call: Option<usize>,
    pub configured: bool,
}

impl MockProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: None,
            configured: true,
        }
    }

    /// Replies in order from `replies`, then falls back to the default.
    pub fn scripted(replies: &[&str]) -> Self {
        let mock = Self::new("scripted fallback");
        mock.scripted
            .lock()
            .unwrap()
            .extend(replies.iter().map(|r| r.to_string()));
        mock
    }

    /// Fails the `n`-th generate call (1-based).
    pub fn failing_on_call(n: usize) -> Self {
        Self {
            fail_on_call: Some(n),
            ..Self::new("section digest")
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new("section digest")
        }
    }
}

impl Provider for MockProvider {
    const NAME: &'static str = "mock";
    const MODEL: &'static str = "mock-model";

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.configured {
            Ok(())
        } else {
            Err(ProviderError::MissingCredential {
                provider: "mock",
                env_var: "MOCK_API_KEY",
                alternative: "gemini",
            })
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let call_no = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len()
        };
        if Some(call_no) == self.fail_on_call {
            return Err(ProviderError::Api {
                status: 500,
                message: "mock provider failure".into(),
            });
        }
        if let Some(reply) = self.scripted.lock().unwrap().pop_front() {
            return Ok(reply);
        }
        Ok(self.reply.clone())
    }
}
