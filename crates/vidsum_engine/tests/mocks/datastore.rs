use std::sync::{Arc, Mutex};

use chrono::Utc;
use vidsum_datastore::{
    DataStoreError, NewSummary, StoredSummary, SummaryMode, SummaryStore, TranscriptSource,
};

/// Owned snapshot of one upsert call.
#[derive(Debug, Clone)]
pub struct UpsertRecord {
    pub video_id: String,
    pub title: String,
    pub content: String,
    pub language: String,
    pub mode: SummaryMode,
    pub source: TranscriptSource,
}

#[derive(Clone, Default)]
pub struct MockSummaryStore {
    pub existing: Option<StoredSummary>,
    pub upserted: Arc<Mutex<Vec<UpsertRecord>>>,
    pub find_calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_upsert_with: Option<String>,
}

impl MockSummaryStore {
    pub fn with_existing(summary: StoredSummary) -> Self {
        Self {
            existing: Some(summary),
            ..Default::default()
        }
    }

    pub fn failing_upsert(msg: &str) -> Self {
        Self {
            fail_upsert_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl SummaryStore for MockSummaryStore {
    async fn find(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Option<StoredSummary>, DataStoreError> {
        self.find_calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), language.to_string()));
        Ok(self
            .existing
            .clone()
            .filter(|s| s.video_id == video_id && s.language == language))
    }

    async fn upsert(&self, summary: &NewSummary<'_>) -> Result<StoredSummary, DataStoreError> {
        if let Some(ref msg) = self.fail_upsert_with {
            return Err(DataStoreError::Database(sqlx::Error::Protocol(
                msg.clone(),
            )));
        }
        self.upserted.lock().unwrap().push(UpsertRecord {
            video_id: summary.video_id.to_string(),
            title: summary.title.to_string(),
            content: summary.content.to_string(),
            language: summary.language.to_string(),
            mode: summary.mode,
            source: summary.source,
        });
        Ok(StoredSummary {
            id: self.upserted.lock().unwrap().len() as i64,
            video_id: summary.video_id.to_string(),
            title: summary.title.to_string(),
            content: summary.content.to_string(),
            language: summary.language.to_string(),
            mode: summary.mode,
            source: summary.source,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn list_recent(&self, _limit: i64) -> Result<Vec<StoredSummary>, DataStoreError> {
        Ok(self.existing.clone().into_iter().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredSummary>, DataStoreError> {
        Ok(self.existing.clone().filter(|s| s.id == id))
    }
}
