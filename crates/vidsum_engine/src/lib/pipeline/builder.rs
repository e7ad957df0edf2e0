use vidsum_datastore::SummaryStore;

use crate::{
    llm::Provider,
    pipeline::{ChunkingConfig, SummarizationPipeline},
    transcript::TranscriptAcquirer,
};

pub struct SummarizationPipelineBuilder<D = (), A = (), P = ()> {
    store: D,
    acquirer: A,
    provider: P,
    chunking: ChunkingConfig,
}

impl SummarizationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            store: (),
            acquirer: (),
            provider: (),
            chunking: ChunkingConfig::default(),
        }
    }
}

impl Default for SummarizationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, A, P> SummarizationPipelineBuilder<D, A, P> {
    pub fn store<D2: SummaryStore + Send + Sync + 'static>(
        self,
        store: D2,
    ) -> SummarizationPipelineBuilder<D2, A, P> {
        SummarizationPipelineBuilder {
            store,
            acquirer: self.acquirer,
            provider: self.provider,
            chunking: self.chunking,
        }
    }

    pub fn acquirer<A2: TranscriptAcquirer + Send + Sync + 'static>(
        self,
        acquirer: A2,
    ) -> SummarizationPipelineBuilder<D, A2, P> {
        SummarizationPipelineBuilder {
            store: self.store,
            acquirer,
            provider: self.provider,
            chunking: self.chunking,
        }
    }

    pub fn provider<P2: Provider + Send + Sync + 'static>(
        self,
        provider: P2,
    ) -> SummarizationPipelineBuilder<D, A, P2> {
        SummarizationPipelineBuilder {
            store: self.store,
            acquirer: self.acquirer,
            provider,
            chunking: self.chunking,
        }
    }

    pub fn chunking(mut self, chunk_size: usize, overlap: usize) -> Self {
        self.chunking = ChunkingConfig {
            chunk_size,
            overlap,
        };
        self
    }
}

impl<D, A, P> SummarizationPipelineBuilder<D, A, P>
where
    D: SummaryStore + Send + Sync + 'static,
    A: TranscriptAcquirer + Send + Sync + 'static,
    P: Provider + Send + Sync + 'static,
{
    pub fn build(self) -> SummarizationPipeline<D, A, P> {
        SummarizationPipeline {
            store: self.store,
            acquirer: self.acquirer,
            provider: self.provider,
            chunking: self.chunking,
        }
    }
}
