//! Fetch and enrich command handlers.

use std::future::Future;

use brandmon_core::AppConfig;
use brandmon_monitor::{
    Classifier, EnrichOptions, EnrichOutcome, EnrichProgress, FetchContext, FetchOptions,
    MonitorError, OllamaClient, RedditCredentials, RedditEndpoints,
};

/// Pick Reddit credentials from the command line, falling back to config.
///
/// # Errors
///
/// Returns an error naming the missing variable when neither source has a value.
pub(crate) fn resolve_credentials(
    config: &AppConfig,
    client_id: Option<String>,
    client_secret: Option<String>,
) -> anyhow::Result<RedditCredentials> {
    let client_id = client_id
        .or_else(|| config.reddit_client_id.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("missing Reddit client id: set REDDIT_CLIENT_ID or pass --client-id")
        })?;
    let client_secret = client_secret
        .or_else(|| config.reddit_client_secret.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "missing Reddit client secret: set REDDIT_CLIENT_SECRET or pass --client-secret"
            )
        })?;

    Ok(RedditCredentials {
        client_id,
        client_secret,
        user_agent: config.user_agent.clone(),
    })
}

/// Search each channel for `brand` and store novel posts.
///
/// # Errors
///
/// Returns an error if Reddit rejects the credentials or the store fails.
/// Unavailable channels are reported and skipped.
pub(crate) async fn run_fetch(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    credentials: RedditCredentials,
    brand: &str,
    channels: &[String],
) -> anyhow::Result<()> {
    let channels: Vec<String> = channels
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if channels.is_empty() {
        anyhow::bail!("no channels given; pass --channels a,b");
    }

    let ctx = FetchContext {
        credentials,
        options: FetchOptions::from_app_config(config),
        request_timeout_secs: config.request_timeout_secs,
        endpoints: RedditEndpoints::default(),
    };

    let report = match brandmon_monitor::fetch_reddit_mentions(pool, &ctx, brand, &channels).await
    {
        Ok(report) => report,
        Err(MonitorError::SourceAuth(message)) => {
            anyhow::bail!("Reddit rejected the credentials: {message}");
        }
        Err(e) => return Err(e.into()),
    };

    for failure in &report.failed_channels {
        println!("skipped r/{}: {}", failure.channel, failure.message);
    }
    println!(
        "fetch complete for '{brand}': {} new mentions, {} already stored, {} of {} channels failed",
        report.inserted,
        report.skipped,
        report.failed_channels.len(),
        channels.len()
    );
    Ok(())
}

/// Classify every pending mention of `brand`, printing a line per mention.
///
/// Ctrl-C stops the pass; mentions already committed keep their labels and
/// the rest stay pending.
///
/// # Errors
///
/// Returns an error if the generation client cannot be built or the store fails.
pub(crate) async fn run_enrich(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    brand: &str,
    concurrency: usize,
) -> anyhow::Result<()> {
    let pending = brandmon_db::count_pending_mentions(pool, brand).await?;
    if pending == 0 {
        println!("no pending mentions for '{brand}'");
        return Ok(());
    }
    tracing::info!(brand, pending, concurrency, "starting enrichment pass");

    let client = OllamaClient::new(
        &config.ollama_url,
        &config.model,
        config.generation_timeout_secs,
    )?;
    tracing::info!(model = client.model(), url = %config.ollama_url, "using generation service");
    let classifier = Classifier::new(client);

    let pass = brandmon_monitor::enrich_pending(
        pool,
        &classifier,
        brand,
        EnrichOptions { concurrency },
        print_progress,
    );

    tokio::select! {
        result = pass => {
            let report = result?;
            if report.total == 0 {
                println!("no pending mentions for '{brand}'");
            } else {
                println!(
                    "enrichment complete for '{brand}': {} analyzed, {} still pending",
                    report.analyzed, report.still_pending
                );
            }
        }
        () = interrupted(tokio::signal::ctrl_c()) => {
            tracing::warn!(brand, "enrichment interrupted");
            println!("interrupted; unfinished mentions remain pending");
        }
    }

    Ok(())
}

/// Resolves once `signal` fires.
///
/// A signal handler that fails to install never resolves, so the pass it
/// races against runs to completion.
async fn interrupted<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!(error = %e, "could not listen for ctrl-c; enrichment cannot be interrupted");
        std::future::pending::<()>().await;
    }
}

fn print_progress(progress: &EnrichProgress) {
    match &progress.outcome {
        EnrichOutcome::Analyzed => println!(
            "[{}/{}] mention {} analyzed",
            progress.completed, progress.total, progress.mention_id
        ),
        EnrichOutcome::LeftPending { failed } => println!(
            "[{}/{}] mention {} left pending ({} failed)",
            progress.completed,
            progress.total,
            progress.mention_id,
            failed.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::interrupted;

    #[tokio::test]
    async fn delivered_signal_interrupts() {
        let delivered = async { Ok::<(), std::io::Error>(()) };
        let result = tokio::time::timeout(Duration::from_millis(50), interrupted(delivered)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failed_signal_handler_never_interrupts() {
        let failing = async { Err::<(), _>(std::io::Error::other("no signal driver")) };
        let result = tokio::time::timeout(Duration::from_millis(50), interrupted(failing)).await;
        assert!(result.is_err(), "a failed handler must not end the pass");
    }
}
