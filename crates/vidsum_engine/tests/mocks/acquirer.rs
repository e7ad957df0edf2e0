use std::sync::{Arc, Mutex};

use vidsum_datastore::TranscriptSource;
use vidsum_engine::{AcquiredTranscript, AcquisitionError, TranscriptAcquirer};

#[derive(Clone)]
pub struct MockAcquirer {
    pub text: String,
    pub title: String,
    pub source: TranscriptSource,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockAcquirer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            title: "A Mock Video".to_string(),
            source: TranscriptSource::Captioned,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

impl TranscriptAcquirer for MockAcquirer {
    async fn acquire(&self, video_id: &str) -> Result<AcquiredTranscript, AcquisitionError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(AcquisitionError::Download(msg.clone()));
        }
        Ok(AcquiredTranscript {
            text: self.text.clone(),
            source: self.source,
            title: self.title.clone(),
        })
    }
}
