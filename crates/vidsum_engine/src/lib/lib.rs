pub mod chunker;
mod error;
pub mod llm;
mod pipeline;
mod progress;
pub mod prompts;
pub mod sanitizer;
pub mod tracing;
pub mod transcript;
mod video;

pub use chunker::Chunk;
pub use error::Error;
pub use llm::{availability, Provider, ProviderChoice, ProviderError};
pub use pipeline::{
    builder::SummarizationPipelineBuilder, ChunkingConfig, SummarizationPipeline, SummaryRequest,
};
pub use progress::{progress_channel, ProgressEvent, ProgressSink, Stage, StreamClosed};
pub use sanitizer::sanitize;
pub use transcript::{AcquiredTranscript, AcquisitionError, FallbackAcquirer, TranscriptAcquirer};
pub use video::extract_video_id;
