//! Transcript acquisition with fallback.
//!
//! A video id resolves to transcript text through an ordered chain: an
//! existing caption track first, then the audio pipeline (probe, download,
//! transcode, speech-to-text). The chain runs at most once per request;
//! transient failures surface to the caller instead of being retried.

pub mod whisper;
pub mod ytdlp;

use std::{
    cmp::Ordering,
    future::Future,
    path::{Path, PathBuf},
};

use vidsum_datastore::TranscriptSource;

/// Title used when captions yield nothing usable.
pub const FALLBACK_TITLE: &str = "Untitled video";

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("caption retrieval failed: {detail}")]
    Captions { detail: String },
    #[error("failed to probe video metadata: {0}")]
    Probe(String),
    #[error("no suitable audio format available")]
    NoAudioFormat,
    #[error("audio download failed: {0}")]
    Download(String),
    #[error("audio transcode failed: {0}")]
    Transcode(String),
    #[error("speech-to-text is not configured: set OPENAI_API_KEY to enable audio transcription")]
    SpeechToTextUnavailable,
    #[error("speech-to-text failed: {0}")]
    SpeechToText(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One caption cue, in track order.
#[derive(Debug, Clone)]
pub struct CaptionEntry {
    pub text: String,
}

/// Descriptive metadata plus the audio-only encodings a video offers.
#[derive(Debug, Clone)]
pub struct VideoProbe {
    pub title: String,
    pub duration_seconds: f64,
    pub audio_formats: Vec<AudioFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioFormat {
    pub format_id: String,
    pub codec: String,
    pub bitrate: Option<f64>,
}

/// Retrieves an existing caption track.
pub trait CaptionFetcher {
    fn fetch_captions(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<Vec<CaptionEntry>, AcquisitionError>> + Send;
}

/// Probes, downloads and transcodes a video's audio.
pub trait MediaFetcher {
    fn probe(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoProbe, AcquisitionError>> + Send;

    /// Downloads the selected encoding into `dest_dir`; returns the path of
    /// the file written.
    fn download_audio(
        &self,
        video_id: &str,
        format_id: &str,
        dest_dir: &Path,
    ) -> impl Future<Output = Result<PathBuf, AcquisitionError>> + Send;

    /// Rewrites `input` as mono 16 kHz FLAC at `output`.
    fn transcode_for_transcription(
        &self,
        input: &Path,
        output: &Path,
    ) -> impl Future<Output = Result<(), AcquisitionError>> + Send;
}

/// Turns an audio file into text.
pub trait SpeechToText {
    fn is_configured(&self) -> bool;

    fn transcribe(
        &self,
        audio: &Path,
    ) -> impl Future<Output = Result<String, AcquisitionError>> + Send;
}

#[derive(Debug, Clone)]
pub struct AcquiredTranscript {
    pub text: String,
    pub source: TranscriptSource,
    pub title: String,
}

/// Resolves a video id to transcript text.
pub trait TranscriptAcquirer {
    fn acquire(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<AcquiredTranscript, AcquisitionError>> + Send;
}

/// Caption-first acquirer falling back to the audio pipeline.
#[derive(Debug)]
pub struct FallbackAcquirer<C, M, S> {
    captions: C,
    media: M,
    stt: S,
    workdir: PathBuf,
}

impl<C, M, S> FallbackAcquirer<C, M, S>
where
    C: CaptionFetcher + Send + Sync,
    M: MediaFetcher + Send + Sync,
    S: SpeechToText + Send + Sync,
{
    pub fn new(captions: C, media: M, stt: S, workdir: impl Into<PathBuf>) -> Self {
        Self {
            captions,
            media,
            stt,
            workdir: workdir.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn acquire_via_audio(
        &self,
        video_id: &str,
    ) -> Result<AcquiredTranscript, AcquisitionError> {
        if !self.stt.is_configured() {
            return Err(AcquisitionError::SpeechToTextUnavailable);
        }

        let probe = self.media.probe(video_id).await?;
        tracing::info!(
            title = %probe.title,
            duration = probe.duration_seconds,
            formats = probe.audio_formats.len(),
            "Probed video for audio transcription"
        );

        let format =
            select_audio_format(&probe.audio_formats).ok_or(AcquisitionError::NoAudioFormat)?;

        // every intermediate artifact lives here; removed on drop no
        // matter where the chain fails
        let scratch = ScratchDir::create(self.workdir.join(video_id))?;

        let raw = self
            .media
            .download_audio(video_id, &format.format_id, scratch.path())
            .await?;
        let flac = scratch.path().join(format!("{video_id}.flac"));
        self.media.transcode_for_transcription(&raw, &flac).await?;

        let text = self.stt.transcribe(&flac).await?;

        Ok(AcquiredTranscript {
            text,
            source: TranscriptSource::Transcribed,
            title: probe.title,
        })
    }
}

impl<C, M, S> TranscriptAcquirer for FallbackAcquirer<C, M, S>
where
    C: CaptionFetcher + Send + Sync,
    M: MediaFetcher + Send + Sync,
    S: SpeechToText + Send + Sync,
{
    #[tracing::instrument(skip(self))]
    async fn acquire(&self, video_id: &str) -> Result<AcquiredTranscript, AcquisitionError> {
        match self.captions.fetch_captions(video_id).await {
            Ok(entries) if !entries.is_empty() => {
                let text = entries
                    .iter()
                    .map(|entry| entry.text.trim())
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                let title = fallback_title(&entries);
                return Ok(AcquiredTranscript {
                    text,
                    source: TranscriptSource::Captioned,
                    title,
                });
            }
            Ok(_) => {
                tracing::debug!(%video_id, "No caption entries; falling back to audio");
            }
            Err(e) => {
                tracing::debug!(error = ?e, %video_id, "Caption retrieval failed; falling back to audio");
            }
        }

        self.acquire_via_audio(video_id).await
    }
}

/// Prefers the opus codec family, else the highest-bitrate encoding.
pub fn select_audio_format(formats: &[AudioFormat]) -> Option<&AudioFormat> {
    formats
        .iter()
        .find(|format| format.codec.starts_with("opus"))
        .or_else(|| {
            formats
                .iter()
                .filter(|format| format.bitrate.is_some())
                .max_by(|a, b| {
                    a.bitrate
                        .partial_cmp(&b.bitrate)
                        .unwrap_or(Ordering::Equal)
                })
        })
        .or_else(|| formats.first())
}

/// Derives a title from the opening caption cues: the first five entries
/// joined, cut at the first sentence terminator, capped at 100 characters.
/// Anything shorter than 10 characters is not a title.
fn fallback_title(entries: &[CaptionEntry]) -> String {
    let joined = entries
        .iter()
        .take(5)
        .map(|entry| entry.text.trim())
        .collect::<Vec<_>>()
        .join(" ");

    let lead = joined
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    let title: String = lead.chars().take(100).collect();

    if title.chars().count() < 10 {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}

/// Scoped scratch directory; removed on drop, success or failure.
pub(crate) struct ScratchDir(PathBuf);

impl ScratchDir {
    pub(crate) fn create(path: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&path)?;
        Ok(ScratchDir(path))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            tracing::warn!(error = ?e, path = ?self.0, "Failed to clean up scratch directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> CaptionEntry {
        CaptionEntry {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_select_prefers_opus_family() {
        let formats = vec![
            AudioFormat {
                format_id: "140".into(),
                codec: "mp4a.40.2".into(),
                bitrate: Some(129.5),
            },
            AudioFormat {
                format_id: "251".into(),
                codec: "opus".into(),
                bitrate: Some(112.0),
            },
        ];
        assert_eq!(select_audio_format(&formats).unwrap().format_id, "251");
    }

    #[test]
    fn test_select_falls_back_to_highest_bitrate() {
        let formats = vec![
            AudioFormat {
                format_id: "139".into(),
                codec: "mp4a.40.5".into(),
                bitrate: Some(48.0),
            },
            AudioFormat {
                format_id: "140".into(),
                codec: "mp4a.40.2".into(),
                bitrate: Some(129.5),
            },
        ];
        assert_eq!(select_audio_format(&formats).unwrap().format_id, "140");
    }

    #[test]
    fn test_select_handles_missing_bitrates_and_empty_input() {
        let formats = vec![AudioFormat {
            format_id: "0".into(),
            codec: "mp4a".into(),
            bitrate: None,
        }];
        assert_eq!(select_audio_format(&formats).unwrap().format_id, "0");
        assert!(select_audio_format(&[]).is_none());
    }

    #[test]
    fn test_fallback_title_cuts_at_first_sentence_end() {
        let entries = vec![
            entry("Welcome to the deep dive"),
            entry("into Rust generics."),
            entry("Today we cover traits."),
        ];
        assert_eq!(
            fallback_title(&entries),
            "Welcome to the deep dive into Rust generics"
        );
    }

    #[test]
    fn test_fallback_title_uses_at_most_five_entries() {
        let entries: Vec<CaptionEntry> =
            (1..=8).map(|i| entry(&format!("cue number {i}"))).collect();
        let title = fallback_title(&entries);
        assert!(title.contains("cue number 5"));
        assert!(!title.contains("cue number 6"));
    }

    #[test]
    fn test_fallback_title_caps_at_100_chars() {
        let entries = vec![entry(&"word ".repeat(60))];
        assert_eq!(fallback_title(&entries).chars().count(), 100);
    }

    #[test]
    fn test_fallback_title_placeholder_for_short_leads() {
        let entries = vec![entry("Hi all. The rest comes after the terminator")];
        assert_eq!(fallback_title(&entries), FALLBACK_TITLE);
        assert_eq!(fallback_title(&[]), FALLBACK_TITLE);
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let path = std::env::temp_dir().join(format!("vidsum-scratch-{}", std::process::id()));
        {
            let scratch = ScratchDir::create(path.clone()).unwrap();
            std::fs::write(scratch.path().join("artifact.tmp"), b"x").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
