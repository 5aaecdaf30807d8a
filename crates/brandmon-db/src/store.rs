//! The record-store seam used by the fetch and enrichment pipelines.

use async_trait::async_trait;
use brandmon_core::{MentionLabels, NewMention};
use sqlx::PgPool;

use crate::mentions::{
    insert_mention_if_absent, list_mentions_by_brand, update_mention_labels, MentionRow,
};
use crate::{run_migrations, DbError};

/// Durable storage for mentions.
///
/// `insert_if_absent` and `update_labels` must each be atomic: a URL is
/// inserted at most once, and a label triple is written whole or not at all.
#[async_trait]
pub trait MentionStore: Send + Sync {
    /// Ensure the schema exists. Idempotent.
    async fn initialize(&self) -> Result<(), DbError>;

    /// Insert `mention` unless its URL is already stored; `true` if a row was created.
    async fn insert_if_absent(&self, mention: &NewMention) -> Result<bool, DbError>;

    /// All mentions of `brand`, newest first.
    async fn query_by_brand(&self, brand: &str) -> Result<Vec<MentionRow>, DbError>;

    /// Set the three labels on an existing mention.
    async fn update_labels(&self, id: i64, labels: &MentionLabels) -> Result<(), DbError>;
}

#[async_trait]
impl MentionStore for PgPool {
    async fn initialize(&self) -> Result<(), DbError> {
        run_migrations(self).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, mention: &NewMention) -> Result<bool, DbError> {
        Ok(insert_mention_if_absent(self, mention).await?.is_some())
    }

    async fn query_by_brand(&self, brand: &str) -> Result<Vec<MentionRow>, DbError> {
        list_mentions_by_brand(self, brand).await
    }

    async fn update_labels(&self, id: i64, labels: &MentionLabels) -> Result<(), DbError> {
        update_mention_labels(self, id, labels).await
    }
}
