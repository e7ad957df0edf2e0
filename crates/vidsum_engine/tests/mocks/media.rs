use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use vidsum_engine::transcript::{AcquisitionError, AudioFormat, MediaFetcher, VideoProbe};

#[derive(Clone)]
pub struct MockMediaFetcher {
    pub title: String,
    pub formats: Vec<AudioFormat>,
    /// Operation log: "probe", "download:<format_id>", "transcode".
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_probe_with: Option<String>,
    pub fail_download_with: Option<String>,
}

impl MockMediaFetcher {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            formats: vec![AudioFormat {
                format_id: "251".into(),
                codec: "opus".into(),
                bitrate: Some(112.0),
            }],
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_probe_with: None,
            fail_download_with: None,
        }
    }

    pub fn without_formats(mut self) -> Self {
        self.formats.clear();
        self
    }

    pub fn failing_probe(msg: &str) -> Self {
        Self {
            fail_probe_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }

    pub fn failing_download(msg: &str) -> Self {
        Self {
            fail_download_with: Some(msg.to_string()),
            ..Self::new("Unfetchable Video")
        }
    }
}

impl MediaFetcher for MockMediaFetcher {
    async fn probe(&self, _video_id: &str) -> Result<VideoProbe, AcquisitionError> {
        self.calls.lock().unwrap().push("probe".to_string());
        if let Some(ref msg) = self.fail_probe_with {
            return Err(AcquisitionError::Probe(msg.clone()));
        }
        Ok(VideoProbe {
            title: self.title.clone(),
            duration_seconds: 600.0,
            audio_formats: self.formats.clone(),
        })
    }

    async fn download_audio(
        &self,
        video_id: &str,
        format_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, AcquisitionError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("download:{format_id}"));
        if let Some(ref msg) = self.fail_download_with {
            return Err(AcquisitionError::Download(msg.clone()));
        }
        Ok(dest_dir.join(format!("{video_id}.webm")))
    }

    async fn transcode_for_transcription(
        &self,
        _input: &Path,
        _output: &Path,
    ) -> Result<(), AcquisitionError> {
        self.calls.lock().unwrap().push("transcode".to_string());
        Ok(())
    }
}
