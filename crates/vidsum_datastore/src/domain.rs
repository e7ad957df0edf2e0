use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title shown when a summary has no usable content to derive one from.
pub const PLACEHOLDER_TITLE: &str = "Untitled summary";

/// Header forms a summary may carry as its first structured line. The
/// glyphs double as the reserved section markers the sanitizer leaves
/// untouched.
const TITLE_MARKERS: [&str; 4] = ["🎯 TITLE:", "📝 TITLE:", "🎯 제목:", "📝 제목:"];
const MARKER_GLYPHS: [char; 2] = ['🎯', '📝'];

/// How the transcript behind a summary was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    /// An existing caption track was available.
    Captioned,
    /// Derived from the video's audio via speech-to-text.
    Transcribed,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptSource::Captioned => "captioned",
            TranscriptSource::Transcribed => "transcribed",
        }
    }
}

impl fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranscriptSource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "captioned" => Ok(TranscriptSource::Captioned),
            "transcribed" => Ok(TranscriptSource::Transcribed),
            other => Err(UnknownVariant {
                field: "source",
                value: other.to_string(),
            }),
        }
    }
}

/// Summary style selector. Only the final combining prompt looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    Brief,
    Detailed,
    Chapters,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Brief => "brief",
            SummaryMode::Detailed => "detailed",
            SummaryMode::Chapters => "chapters",
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "brief" => Ok(SummaryMode::Brief),
            "detailed" => Ok(SummaryMode::Detailed),
            "chapters" => Ok(SummaryMode::Chapters),
            other => Err(UnknownVariant {
                field: "mode",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {field} '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

/// A persisted summary row. At most one exists per (video_id, language)
/// pair, enforced by upsert semantics rather than a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSummary {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub content: String,
    pub language: String,
    pub mode: SummaryMode,
    pub source: TranscriptSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredSummary {
    /// Title suitable for list/detail display, derived from the summary
    /// content itself.
    pub fn display_title(&self) -> String {
        display_title(&self.content)
    }
}

/// Field set for an upsert. Timestamps are assigned by the store.
#[derive(Debug, Clone, Copy)]
pub struct NewSummary<'a> {
    pub video_id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub language: &'a str,
    pub mode: SummaryMode,
    pub source: TranscriptSource,
}

/// Derives a display title from summary content.
///
/// The first line matching one of the recognized `marker: value` header
/// forms wins. Otherwise the first non-blank line is used with any leading
/// marker glyph stripped, and empty content falls back to a placeholder.
pub fn display_title(content: &str) -> String {
    for line in content.lines() {
        let line = line.trim();
        for marker in TITLE_MARKERS {
            if let Some(rest) = line.strip_prefix(marker) {
                let title = rest.trim();
                if !title.is_empty() {
                    return title.to_string();
                }
            }
        }
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            line.trim_start_matches(MARKER_GLYPHS)
                .trim_start_matches('#')
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string())
}
