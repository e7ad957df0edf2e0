use std::sync::{Arc, Mutex};

use vidsum_engine::transcript::{AcquisitionError, CaptionEntry, CaptionFetcher};

#[derive(Clone)]
pub struct MockCaptionFetcher {
    pub entries: Vec<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockCaptionFetcher {
    pub fn new(entries: &[&str]) -> Self {
        Self {
            entries: entries.iter().map(|e| e.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(&[])
        }
    }
}

impl CaptionFetcher for MockCaptionFetcher {
    async fn fetch_captions(&self, video_id: &str) -> Result<Vec<CaptionEntry>, AcquisitionError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(AcquisitionError::Captions {
                detail: msg.clone(),
            });
        }
        Ok(self
            .entries
            .iter()
            .map(|text| CaptionEntry { text: text.clone() })
            .collect())
    }
}
