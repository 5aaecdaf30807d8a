//! Read-only mention queries, reports, and summaries.

use brandmon_core::AppConfig;
use brandmon_db::{MentionRow, MentionStore};
use brandmon_monitor::{OllamaClient, SummaryKind, SUMMARY_FAILED_MESSAGE};

const TEXT_PREVIEW_CHARS: usize = 80;

/// List every brand with stored mentions.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_brands(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let brands = brandmon_db::list_brand_summaries(pool).await?;

    if brands.is_empty() {
        println!("no mentions stored yet; run `fetch` first");
        return Ok(());
    }

    println!("{:<25}{:<10}{:<10}LATEST", "BRAND", "TOTAL", "PENDING");
    for row in &brands {
        let latest = row
            .latest_posted_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{:<25}{:<10}{:<10}{}",
            row.brand, row.mention_count, row.pending_count, latest
        );
    }

    Ok(())
}

/// Show mentions of `brand`, newest first, optionally filtered by sentiment.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_mentions(
    pool: &sqlx::PgPool,
    brand: &str,
    sentiment: Option<&str>,
) -> anyhow::Result<()> {
    let rows = pool.query_by_brand(brand).await?;
    let selected: Vec<&MentionRow> = match sentiment {
        Some(label) => brandmon_monitor::filter_by_sentiment(&rows, label),
        None => rows.iter().collect(),
    };

    if selected.is_empty() {
        println!(
            "no mentions found for '{brand}'{}",
            sentiment
                .map(|s| format!(" with sentiment '{s}'"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "{:<8}{:<18}{:<14}{:<24}{:<14}TEXT",
        "ID", "POSTED", "SENTIMENT", "TOPIC", "URGENCY"
    );
    for row in selected {
        println!(
            "{:<8}{:<18}{:<14}{:<24}{:<14}{}",
            row.id,
            row.posted_at.format("%Y-%m-%d %H:%M").to_string(),
            row.sentiment.as_deref().unwrap_or("pending"),
            row.topic.as_deref().unwrap_or("-"),
            row.urgency.as_deref().unwrap_or("-"),
            preview(&row.text)
        );
    }

    Ok(())
}

/// Print a markdown report of sentiment, topics, and pending count for `brand`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_report(pool: &sqlx::PgPool, brand: &str) -> anyhow::Result<()> {
    let rows = pool.query_by_brand(brand).await?;

    if rows.is_empty() {
        println!("no mentions stored for '{brand}'; run `fetch` first");
        return Ok(());
    }

    let analyzed = brandmon_monitor::analyzed(&rows).count();
    let pending = brandmon_monitor::pending(&rows).count();

    println!("# Mention Report: {brand}");
    println!();
    println!("**Mentions**: {}", rows.len());
    println!("**Analyzed**: {analyzed}");
    println!("**Pending**: {pending}");
    println!();

    if analyzed == 0 {
        println!("no analyzed mentions yet; run `enrich --brand {brand}`");
        return Ok(());
    }

    println!("## Sentiment");
    println!();
    println!("| Sentiment | Mentions |");
    println!("|-----------|----------|");
    for (label, count) in brandmon_monitor::sentiment_distribution(&rows) {
        println!("| {label} | {count} |");
    }
    println!();

    let mut topics: Vec<(String, usize)> =
        brandmon_monitor::topic_frequency(&rows).into_iter().collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!("## Topics");
    println!();
    println!("| Topic | Mentions |");
    println!("|-------|----------|");
    for (label, count) in topics {
        println!("| {label} | {count} |");
    }

    Ok(())
}

/// Generate and print one cohort summary for `brand`.
///
/// A failed generation call prints [`SUMMARY_FAILED_MESSAGE`] instead of
/// failing the command.
///
/// # Errors
///
/// Returns an error if the database query fails or the generation client
/// cannot be built.
pub(crate) async fn run_summarize(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    brand: &str,
    kind: SummaryKind,
) -> anyhow::Result<()> {
    let rows = pool.query_by_brand(brand).await?;
    let client = OllamaClient::new(
        &config.ollama_url,
        &config.model,
        config.generation_timeout_secs,
    )?;

    let summary =
        match brandmon_monitor::generate_summary(&client, &rows, kind, config.summary_max_chars)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(brand, kind = kind.title(), error = %e, "summary generation failed");
                SUMMARY_FAILED_MESSAGE.to_string()
            }
        };

    println!("## {}: {brand}", kind.title());
    println!();
    println!("{summary}");
    Ok(())
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(TEXT_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}
