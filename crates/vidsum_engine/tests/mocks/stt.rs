use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use vidsum_engine::transcript::{AcquisitionError, SpeechToText};

#[derive(Clone)]
pub struct MockSpeechToText {
    pub text: String,
    pub configured: bool,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_with: Option<String>,
}

impl MockSpeechToText {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new("")
        }
    }
}

impl SpeechToText for MockSpeechToText {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn transcribe(&self, audio: &Path) -> Result<String, AcquisitionError> {
        self.calls.lock().unwrap().push(audio.to_path_buf());
        if let Some(ref msg) = self.fail_with {
            return Err(AcquisitionError::SpeechToText(msg.clone()));
        }
        Ok(self.text.clone())
    }
}
