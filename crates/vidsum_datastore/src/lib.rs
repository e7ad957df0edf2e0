//! # Summary DataStore
//!
//! This crate persists generated video summaries in Postgres, keyed by
//! (video id, target language). A summary is inserted on the first
//! successful run for a key and updated in place on subsequent runs.
//!
//! The crate uses sqlx for database operations and exposes the
//! [`SummaryStore`] trait as the abstraction the summarization pipeline
//! persists through.

mod datastore;
mod domain;

pub use datastore::postgres::PgSummaryStore;
pub use datastore::{DataStoreError, SummaryStore};
pub use domain::{
    display_title, NewSummary, StoredSummary, SummaryMode, TranscriptSource, UnknownVariant,
    PLACEHOLDER_TITLE,
};
