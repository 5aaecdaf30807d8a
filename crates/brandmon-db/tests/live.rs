//! Live integration tests for brandmon-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/brandmon-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use brandmon_core::{MentionLabels, NewMention};
use brandmon_db::{
    count_pending_mentions, insert_mention_if_absent, list_brand_summaries,
    list_mentions_by_brand, run_migrations, update_mention_labels, DbError, MentionStore,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
}

fn mention(brand: &str, url: &str, posted_at: DateTime<Utc>) -> NewMention {
    NewMention {
        brand: brand.to_string(),
        source: "reddit".to_string(),
        channel: "testsub".to_string(),
        text: format!("{brand} post at {url}"),
        url: url.to_string(),
        posted_at,
    }
}

fn labels(sentiment: &str) -> MentionLabels {
    MentionLabels {
        sentiment: sentiment.to_string(),
        topic: "Other".to_string(),
        urgency: "Low Urgency".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_if_absent_is_true_then_false(pool: sqlx::PgPool) {
    let m = mention("Acme", "https://reddit.com/r/a/1", base_time());

    assert!(pool.insert_if_absent(&m).await.unwrap());
    assert!(!pool.insert_if_absent(&m).await.unwrap());

    let rows = list_mentions_by_brand(&pool, "Acme").await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn url_dedup_is_global_across_brands(pool: sqlx::PgPool) {
    let url = "https://reddit.com/r/a/shared";
    let first = insert_mention_if_absent(&pool, &mention("Acme", url, base_time()))
        .await
        .unwrap();
    let second = insert_mention_if_absent(&pool, &mention("Globex", url, base_time()))
        .await
        .unwrap();

    assert!(first.is_some());
    assert!(second.is_none(), "same URL under another brand must not insert");
    assert!(list_mentions_by_brand(&pool, "Globex").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_inserts_of_same_url_create_one_row(pool: sqlx::PgPool) {
    let m = mention("Acme", "https://reddit.com/r/a/race", base_time());
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let m = m.clone();
            tokio::spawn(async move { pool.insert_if_absent(&m).await.unwrap() })
        })
        .collect();

    let mut inserted = 0;
    for task in tasks {
        if task.await.unwrap() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(list_mentions_by_brand(&pool, "Acme").await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn query_by_brand_orders_newest_first(pool: sqlx::PgPool) {
    let t0 = base_time();
    for (i, offset) in [2_i64, 0, 5, 1].into_iter().enumerate() {
        let url = format!("https://reddit.com/r/a/{i}");
        insert_mention_if_absent(&pool, &mention("Acme", &url, t0 + Duration::hours(offset)))
            .await
            .unwrap();
    }
    insert_mention_if_absent(&pool, &mention("Other", "https://reddit.com/r/o/1", t0))
        .await
        .unwrap();

    let rows = pool.query_by_brand("Acme").await.unwrap();
    assert_eq!(rows.len(), 4);
    let times: Vec<_> = rows.iter().map(|r| r.posted_at).collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
    assert!(rows.iter().all(|r| r.brand == "Acme"));
    assert!(rows.iter().all(|r| r.sentiment.is_none()));
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_labels_sets_all_three_fields(pool: sqlx::PgPool) {
    let id = insert_mention_if_absent(&pool, &mention("Acme", "https://reddit.com/r/a/1", base_time()))
        .await
        .unwrap()
        .expect("fresh insert");

    update_mention_labels(&pool, id, &labels("Positive"))
        .await
        .unwrap();

    let rows = list_mentions_by_brand(&pool, "Acme").await.unwrap();
    let row = &rows[0];
    assert_eq!(row.sentiment.as_deref(), Some("Positive"));
    assert_eq!(row.topic.as_deref(), Some("Other"));
    assert_eq!(row.urgency.as_deref(), Some("Low Urgency"));
    assert!(row.analyzed_at.is_some());
    assert!(!row.is_pending());
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_labels_on_missing_id_is_not_found(pool: sqlx::PgPool) {
    let err = pool
        .update_labels(987_654, &labels("Negative"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound(987_654)), "got {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn pending_count_and_brand_summaries_track_labels(pool: sqlx::PgPool) {
    let t0 = base_time();
    let first = insert_mention_if_absent(&pool, &mention("Acme", "https://reddit.com/r/a/1", t0))
        .await
        .unwrap()
        .unwrap();
    insert_mention_if_absent(&pool, &mention("Acme", "https://reddit.com/r/a/2", t0))
        .await
        .unwrap();
    insert_mention_if_absent(&pool, &mention("Globex", "https://reddit.com/r/g/1", t0))
        .await
        .unwrap();

    assert_eq!(count_pending_mentions(&pool, "Acme").await.unwrap(), 2);
    update_mention_labels(&pool, first, &labels("Neutral"))
        .await
        .unwrap();
    assert_eq!(count_pending_mentions(&pool, "Acme").await.unwrap(), 1);

    let summaries = list_brand_summaries(&pool).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].brand, "Acme");
    assert_eq!(summaries[0].mention_count, 2);
    assert_eq!(summaries[0].pending_count, 1);
    assert_eq!(summaries[1].brand, "Globex");
}

#[sqlx::test(migrations = "../../migrations")]
async fn initialize_is_idempotent(pool: sqlx::PgPool) {
    pool.initialize().await.unwrap();
    pool.initialize().await.unwrap();
    assert_eq!(run_migrations(&pool).await.unwrap(), 0);
}
