pub mod builder;

use vidsum_datastore::{NewSummary, SummaryMode, SummaryStore, TranscriptSource};

use crate::{
    chunker,
    llm::{Provider, ProviderError},
    progress::{ProgressEvent, ProgressSink, Stage},
    prompts,
    transcript::TranscriptAcquirer,
    video::extract_video_id,
    Error,
};

/// One summarization request as the pipeline receives it.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub url: String,
    pub language: String,
    pub mode: SummaryMode,
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        ChunkingConfig {
            chunk_size: chunker::DEFAULT_CHUNK_SIZE,
            overlap: chunker::DEFAULT_OVERLAP,
        }
    }
}

/// The incremental summarization pipeline.
///
/// One instance drives one request: cache check, transcript acquisition,
/// chunked generation, the combining pass, persistence. Progress flows
/// through the [`ProgressSink`]; the paired receiver sees zero or more
/// `progress` events and then exactly one terminal event, on every exit
/// path.
pub struct SummarizationPipeline<D, A, P>
where
    D: SummaryStore + Send + Sync + 'static,
    A: TranscriptAcquirer + Send + Sync + 'static,
    P: Provider + Send + Sync + 'static,
{
    store: D,
    acquirer: A,
    provider: P,
    chunking: ChunkingConfig,
}

struct Outcome {
    summary: String,
    source: TranscriptSource,
    warning: Option<String>,
}

impl<D, A, P> SummarizationPipeline<D, A, P>
where
    D: SummaryStore + Send + Sync + 'static,
    A: TranscriptAcquirer + Send + Sync + 'static,
    P: Provider + Send + Sync + 'static,
{
    #[tracing::instrument(skip_all, fields(url = %request.url, language = %request.language))]
    pub async fn run(self, request: SummaryRequest, sink: ProgressSink) {
        match self.run_inner(&request, &sink).await {
            Ok(outcome) => {
                let _ = sink.emit(ProgressEvent::Complete {
                    summary: outcome.summary,
                    source: outcome.source,
                    warning: outcome.warning,
                });
            }
            Err(Error::Stream(_)) => {
                // the consumer is gone; nobody is left to tell
                tracing::warn!("Progress consumer disconnected; abandoning run");
            }
            Err(e) => {
                tracing::error!(error = ?e, "Summarization run failed");
                let _ = sink.emit(ProgressEvent::Error {
                    message: e.to_string(),
                    detail: format!("{e:?}"),
                });
            }
        }
        // the sink is dropped here, closing the stream exactly once on
        // every path out of the run
    }

    async fn run_inner(
        &self,
        request: &SummaryRequest,
        sink: &ProgressSink,
    ) -> Result<Outcome, Error> {
        let video_id = extract_video_id(&request.url)?;

        if let Some(existing) = self.store.find(&video_id, &request.language).await? {
            tracing::info!(%video_id, "Serving cached summary");
            return Ok(Outcome {
                summary: existing.content,
                source: existing.source,
                warning: None,
            });
        }

        // fail on a missing credential before any acquisition work starts
        self.provider.ensure_configured()?;

        sink.progress(Stage::Analyzing, 0, 0, "Fetching transcript")?;
        let transcript = self.acquirer.acquire(&video_id).await?;

        let chunks = chunker::split(
            &transcript.text,
            self.chunking.chunk_size,
            self.chunking.overlap,
        );
        let total_chunks = chunks.len();
        tracing::info!(%video_id, total_chunks, "Transcript chunked");

        // sequential by design: ordered progress, bounded provider load,
        // and a failing chunk is immediately attributable
        let mut sections = Vec::with_capacity(total_chunks);
        for chunk in &chunks {
            sink.progress(
                Stage::Processing,
                chunk.index + 1,
                total_chunks,
                format!("Summarizing section {} of {}", chunk.index + 1, total_chunks),
            )?;
            let section = self
                .provider
                .generate(&prompts::chunk_prompt(chunk, total_chunks, &request.language))
                .await?;
            sections.push(section);
        }

        sink.progress(
            Stage::Finalizing,
            total_chunks,
            total_chunks,
            "Combining section summaries",
        )?;
        let combined = sections.join(prompts::SECTION_SEPARATOR);
        let summary = self
            .provider
            .generate(&prompts::combine_prompt(
                &combined,
                &request.language,
                request.mode,
            ))
            .await?;
        if summary.trim().is_empty() {
            return Err(ProviderError::Empty.into());
        }

        sink.progress(Stage::Saving, total_chunks, total_chunks, "Saving summary")?;
        let warning = match self
            .store
            .upsert(&NewSummary {
                video_id: &video_id,
                title: &transcript.title,
                content: &summary,
                language: &request.language,
                mode: request.mode,
                source: transcript.source,
            })
            .await
        {
            Ok(_) => None,
            Err(e) => {
                // the generated content is not discarded over a storage
                // failure; the run completes with a warning instead
                tracing::warn!(error = ?e, %video_id, "Failed to persist summary");
                Some(format!("summary could not be persisted: {e}"))
            }
        };

        Ok(Outcome {
            summary,
            source: transcript.source,
            warning,
        })
    }
}
