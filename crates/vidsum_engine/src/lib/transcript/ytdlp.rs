//! yt-dlp / ffmpeg backed caption and media fetching.
//!
//! Both capabilities shell out: yt-dlp already tracks YouTube's moving
//! target for caption tracks and format tables, and ffmpeg handles the
//! transcode to the speech-to-text input format.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;

use crate::transcript::{
    AcquisitionError, AudioFormat, CaptionEntry, CaptionFetcher, MediaFetcher, ScratchDir,
    VideoProbe,
};

#[derive(Debug, Clone)]
pub struct YtDlpTool {
    ytdlp_bin: PathBuf,
    ffmpeg_bin: PathBuf,
    workdir: PathBuf,
    caption_langs: String,
}

impl YtDlpTool {
    const VIDEO_BASE_URL: &'static str = "https://youtube.com/watch";

    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_bin: PathBuf::from("yt-dlp"),
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            workdir: workdir.into(),
            caption_langs: "en,en-US".into(),
        }
    }

    /// Comma-separated caption language preference passed to yt-dlp.
    pub fn with_caption_langs(mut self, langs: impl Into<String>) -> Self {
        self.caption_langs = langs.into();
        self
    }

    fn watch_url(video_id: &str) -> String {
        format!("{}?v={}", Self::VIDEO_BASE_URL, video_id)
    }
}

impl CaptionFetcher for YtDlpTool {
    #[tracing::instrument(skip(self))]
    async fn fetch_captions(&self, video_id: &str) -> Result<Vec<CaptionEntry>, AcquisitionError> {
        let scratch = ScratchDir::create(self.workdir.join(format!("{video_id}-subs")))?;
        let template = scratch.path().join(format!("{video_id}.%(ext)s"));

        let output = Command::new(&self.ytdlp_bin)
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                &self.caption_langs,
                "--sub-format",
                "json3",
                "-o",
            ])
            .arg(&template)
            .arg(Self::watch_url(video_id))
            .output()
            .await?;

        if !output.status.success() {
            return Err(AcquisitionError::Captions {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let caption_file = std::fs::read_dir(scratch.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json3"))
            .ok_or_else(|| AcquisitionError::Captions {
                detail: "yt-dlp wrote no caption track".into(),
            })?;

        let raw = tokio::fs::read_to_string(&caption_file).await?;
        parse_json3(&raw)
    }
}

impl MediaFetcher for YtDlpTool {
    #[tracing::instrument(skip(self))]
    async fn probe(&self, video_id: &str) -> Result<VideoProbe, AcquisitionError> {
        let output = Command::new(&self.ytdlp_bin)
            .args(["-J", "--no-warnings", "--no-playlist"])
            .arg(Self::watch_url(video_id))
            .output()
            .await?;

        if !output.status.success() {
            return Err(AcquisitionError::Probe(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_probe_json(&String::from_utf8_lossy(&output.stdout))
    }

    #[tracing::instrument(skip(self))]
    async fn download_audio(
        &self,
        video_id: &str,
        format_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, AcquisitionError> {
        let template = dest_dir.join(format!("{video_id}.%(ext)s"));

        let output = Command::new(&self.ytdlp_bin)
            .args(["-f", format_id, "--no-playlist", "-o"])
            .arg(&template)
            .arg(Self::watch_url(video_id))
            .output()
            .await?;

        if !output.status.success() {
            return Err(AcquisitionError::Download(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        std::fs::read_dir(dest_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem == video_id)
            })
            .ok_or_else(|| {
                AcquisitionError::Download("yt-dlp did not produce expected file".into())
            })
    }

    #[tracing::instrument(skip(self))]
    async fn transcode_for_transcription(
        &self,
        input: &Path,
        output_path: &Path,
    ) -> Result<(), AcquisitionError> {
        let output = Command::new(&self.ffmpeg_bin)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-ac", "1", "-ar", "16000", "-c:a", "flac"])
            .arg(output_path)
            .output()
            .await?;

        if !output.status.success() {
            return Err(AcquisitionError::Transcode(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}

/// JSON3 caption track: a flat list of events, each carrying utf8 segments.
fn parse_json3(raw: &str) -> Result<Vec<CaptionEntry>, AcquisitionError> {
    #[derive(Deserialize)]
    struct Track {
        #[serde(default)]
        events: Vec<Event>,
    }

    #[derive(Deserialize)]
    struct Event {
        #[serde(default)]
        segs: Vec<Segment>,
    }

    #[derive(Deserialize)]
    struct Segment {
        #[serde(default)]
        utf8: String,
    }

    let track: Track = serde_json::from_str(raw).map_err(|e| AcquisitionError::Captions {
        detail: format!("malformed caption track: {e}"),
    })?;

    let entries = track
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then_some(CaptionEntry { text })
        })
        .collect();

    Ok(entries)
}

/// The slice of `yt-dlp -J` output the audio pipeline needs.
fn parse_probe_json(raw: &str) -> Result<VideoProbe, AcquisitionError> {
    #[derive(Deserialize)]
    struct Probe {
        #[serde(default)]
        title: String,
        #[serde(default)]
        duration: f64,
        #[serde(default)]
        formats: Vec<Format>,
    }

    #[derive(Deserialize)]
    struct Format {
        format_id: String,
        #[serde(default)]
        acodec: Option<String>,
        #[serde(default)]
        vcodec: Option<String>,
        #[serde(default)]
        abr: Option<f64>,
    }

    let probe: Probe = serde_json::from_str(raw)
        .map_err(|e| AcquisitionError::Probe(format!("malformed probe output: {e}")))?;

    let audio_formats = probe
        .formats
        .into_iter()
        .filter(|format| {
            let has_audio = format.acodec.as_deref().is_some_and(|c| c != "none");
            let video_free = format.vcodec.as_deref().map_or(true, |c| c == "none");
            has_audio && video_free
        })
        .map(|format| AudioFormat {
            format_id: format.format_id,
            codec: format.acodec.unwrap_or_default(),
            bitrate: format.abr,
        })
        .collect();

    Ok(VideoProbe {
        title: probe.title,
        duration_seconds: probe.duration,
        audio_formats,
    })
}
