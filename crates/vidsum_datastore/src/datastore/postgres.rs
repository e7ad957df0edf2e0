use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::{
    datastore::{DataStoreError, SummaryStore},
    NewSummary, StoredSummary,
};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct PgSummaryStore {
    pub pool: PgPool,
}

impl PgSummaryStore {
    /// Establish connection to database and bring the schema up to date.
    pub async fn init(database_url: &str) -> Result<Self, DataStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))?;

        Ok(PgSummaryStore { pool })
    }
}

/// Raw row shape; `mode` and `source` are stored as text and parsed on
/// the way out so a bad value surfaces as a decode error instead of a
/// panic.
#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    video_id: String,
    title: String,
    content: String,
    language: String,
    mode: String,
    source: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SummaryRow> for StoredSummary {
    type Error = DataStoreError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(StoredSummary {
            id: row.id,
            video_id: row.video_id,
            title: row.title,
            content: row.content,
            language: row.language,
            mode: row.mode.parse()?,
            source: row.source.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl SummaryStore for PgSummaryStore {
    async fn find(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Option<StoredSummary>, DataStoreError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            "SELECT * FROM summaries WHERE video_id = $1 AND language = $2",
        )
        .bind(video_id)
        .bind(language)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, %video_id, %language, "Failed to look up summary");
        })?;

        row.map(StoredSummary::try_from).transpose()
    }

    async fn upsert(&self, summary: &NewSummary<'_>) -> Result<StoredSummary, DataStoreError> {
        // No uniqueness constraint backs the key; update-then-insert keeps
        // last-writer-wins semantics for concurrent identical requests.
        let updated = sqlx::query_as::<_, SummaryRow>(
            r#"
            UPDATE summaries
            SET title = $3, content = $4, mode = $5, source = $6, updated_at = now()
            WHERE video_id = $1 AND language = $2
            RETURNING *
            "#,
        )
        .bind(summary.video_id)
        .bind(summary.language)
        .bind(summary.title)
        .bind(summary.content)
        .bind(summary.mode.as_str())
        .bind(summary.source.as_str())
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, video_id = %summary.video_id, "Failed to update summary");
        })?;

        if let Some(row) = updated {
            return row.try_into();
        }

        let inserted = sqlx::query_as::<_, SummaryRow>(
            r#"
            INSERT INTO summaries (video_id, title, content, language, mode, source)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(summary.video_id)
        .bind(summary.title)
        .bind(summary.content)
        .bind(summary.language)
        .bind(summary.mode.as_str())
        .bind(summary.source.as_str())
        .fetch_one(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, video_id = %summary.video_id, "Failed to insert summary");
        })?;

        inserted.try_into()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<StoredSummary>, DataStoreError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT * FROM summaries ORDER BY updated_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to list summaries"))?;

        rows.into_iter().map(StoredSummary::try_from).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredSummary>, DataStoreError> {
        let row = sqlx::query_as::<_, SummaryRow>("SELECT * FROM summaries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, %id, "Failed to fetch summary"))?;

        row.map(StoredSummary::try_from).transpose()
    }
}
