use serde::Serialize;
use tokio::sync::mpsc;
use vidsum_datastore::TranscriptSource;

/// Pipeline stage reported inside a `progress` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analyzing,
    Processing,
    Finalizing,
    Saving,
}

/// One line of the progress stream. Each request produces zero or more
/// `progress` events followed by exactly one terminal `complete` or
/// `error` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    #[serde(rename_all = "camelCase")]
    Progress {
        current_chunk: usize,
        total_chunks: usize,
        stage: Stage,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        summary: String,
        source: TranscriptSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Error { message: String, detail: String },
}

/// The consumer dropped its end of the stream. No further work should be
/// scheduled for the request.
#[derive(Debug, thiserror::Error)]
#[error("progress stream closed by consumer")]
pub struct StreamClosed;

/// Producer half of the progress stream. The pipeline is the only writer;
/// the transport drains the paired receiver and relays each event as it
/// arrives.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

pub fn progress_channel() -> (ProgressSink, mpsc::UnboundedReceiver<ProgressEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSink { tx }, rx)
}

impl ProgressSink {
    pub fn emit(&self, event: ProgressEvent) -> Result<(), StreamClosed> {
        self.tx.send(event).map_err(|_| StreamClosed)
    }

    pub fn progress(
        &self,
        stage: Stage,
        current_chunk: usize,
        total_chunks: usize,
        message: impl Into<String>,
    ) -> Result<(), StreamClosed> {
        self.emit(ProgressEvent::Progress {
            current_chunk,
            total_chunks,
            stage,
            message: message.into(),
        })
    }
}
