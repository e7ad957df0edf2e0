use vidsum_datastore::DataStoreError;

use crate::{llm::ProviderError, progress::StreamClosed, transcript::AcquisitionError};

/// Everything a pipeline run can fail with. All variants except
/// [`Error::Stream`] are converted into a single terminal `error` event at
/// the orchestration boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("persistence error: {0}")]
    Persistence(#[from] DataStoreError),
    #[error(transparent)]
    Stream(#[from] StreamClosed),
}
