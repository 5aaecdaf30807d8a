//! Database operations for the `mentions` table.

use brandmon_core::{MentionLabels, NewMention};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `mentions` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MentionRow {
    pub id: i64,
    pub public_id: Uuid,
    pub brand: String,
    pub source: String,
    pub channel: String,
    pub text: String,
    pub url: String,
    pub posted_at: DateTime<Utc>,
    pub sentiment: Option<String>,
    pub topic: Option<String>,
    pub urgency: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MentionRow {
    /// A mention is pending until its sentiment label has been written.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.sentiment.is_none()
    }
}

/// Per-brand mention totals.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BrandSummaryRow {
    pub brand: String,
    pub mention_count: i64,
    pub pending_count: i64,
    pub latest_posted_at: Option<DateTime<Utc>>,
}

const MENTION_COLUMNS: &str = "id, public_id, brand, source, channel, text, url, posted_at, \
                               sentiment, topic, urgency, analyzed_at, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a mention unless a row with the same `url` already exists.
///
/// The existence check and insert are a single `ON CONFLICT (url) DO NOTHING`
/// statement, so two concurrent callers can never both insert the same URL.
/// Returns the new row id, or `None` when the URL was already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_mention_if_absent(
    pool: &PgPool,
    mention: &NewMention,
) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO mentions (brand, source, channel, text, url, posted_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (url) DO NOTHING \
         RETURNING id",
    )
    .bind(&mention.brand)
    .bind(&mention.source)
    .bind(&mention.channel)
    .bind(&mention.text)
    .bind(&mention.url)
    .bind(mention.posted_at)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Returns every mention of `brand`, newest `posted_at` first.
///
/// Ties on `posted_at` are broken by `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_mentions_by_brand(
    pool: &PgPool,
    brand: &str,
) -> Result<Vec<MentionRow>, DbError> {
    let rows = sqlx::query_as::<_, MentionRow>(&format!(
        "SELECT {MENTION_COLUMNS} \
         FROM mentions \
         WHERE brand = $1 \
         ORDER BY posted_at DESC, id DESC"
    ))
    .bind(brand)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Write all three labels for one mention and stamp `analyzed_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no mention has `id`, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_mention_labels(
    pool: &PgPool,
    id: i64,
    labels: &MentionLabels,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE mentions \
         SET sentiment = $2, topic = $3, urgency = $4, analyzed_at = now() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&labels.sentiment)
    .bind(&labels.topic)
    .bind(&labels.urgency)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(id));
    }

    Ok(())
}

/// Number of mentions of `brand` still waiting for classification.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_pending_mentions(pool: &PgPool, brand: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM mentions WHERE brand = $1 AND sentiment IS NULL",
    )
    .bind(brand)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Lists every brand that has at least one stored mention, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_summaries(pool: &PgPool) -> Result<Vec<BrandSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandSummaryRow>(
        "SELECT brand, \
                COUNT(*) AS mention_count, \
                COUNT(*) FILTER (WHERE sentiment IS NULL) AS pending_count, \
                MAX(posted_at) AS latest_posted_at \
         FROM mentions \
         GROUP BY brand \
         ORDER BY brand",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sentiment: Option<&str>) -> MentionRow {
        MentionRow {
            id: 1,
            public_id: Uuid::new_v4(),
            brand: "Acme".to_string(),
            source: "reddit".to_string(),
            channel: "acme".to_string(),
            text: "Acme rocket skates exploded".to_string(),
            url: "https://reddit.com/r/acme/comments/1".to_string(),
            posted_at: Utc::now(),
            sentiment: sentiment.map(ToString::to_string),
            topic: None,
            urgency: None,
            analyzed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_is_keyed_on_sentiment_only() {
        assert!(row(None).is_pending());
        assert!(!row(Some("Negative")).is_pending());
    }
}
