use std::future::Future;

use crate::{NewSummary, StoredSummary};

pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum DataStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt row: {0}")]
    Decode(#[from] crate::UnknownVariant),
}

pub trait SummaryStore {
    /// Looks up the summary for a (video id, language) pair. Read-only.
    fn find(
        &self,
        video_id: &str,
        language: &str,
    ) -> impl Future<Output = Result<Option<StoredSummary>, DataStoreError>> + Send;

    /// Updates the existing row for the key, or inserts a new one. Returns
    /// the post-write row.
    fn upsert(
        &self,
        summary: &NewSummary<'_>,
    ) -> impl Future<Output = Result<StoredSummary, DataStoreError>> + Send;

    /// Most recently updated summaries first.
    fn list_recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<StoredSummary>, DataStoreError>> + Send;

    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<StoredSummary>, DataStoreError>> + Send;
}

impl<T: SummaryStore + Send + Sync> SummaryStore for &T {
    async fn find(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Option<StoredSummary>, DataStoreError> {
        (**self).find(video_id, language).await
    }

    async fn upsert(&self, summary: &NewSummary<'_>) -> Result<StoredSummary, DataStoreError> {
        (**self).upsert(summary).await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<StoredSummary>, DataStoreError> {
        (**self).list_recent(limit).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredSummary>, DataStoreError> {
        (**self).find_by_id(id).await
    }
}
