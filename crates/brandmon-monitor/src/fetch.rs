//! Mention ingestion: search each channel and store novel posts.

use std::collections::HashSet;

use brandmon_core::NewMention;
use brandmon_db::MentionStore;

use crate::error::MonitorError;
use crate::sources::{ContentSource, RedditClient};
use crate::types::{ChannelFailure, FetchContext, FetchOptions, FetchReport};

/// Search `channels` in order for `brand` and store every post whose URL is new.
///
/// Known URLs for the brand are loaded once up front; URLs stored during this
/// call are tracked in memory so a post cross-listed in two channels is only
/// inserted once. The store's `insert_if_absent` remains the final arbiter, so
/// URLs stored under another brand or by a concurrent fetch are still skipped.
///
/// Channel failures are logged, recorded in [`FetchReport::failed_channels`],
/// and the next channel is tried.
///
/// # Errors
///
/// Returns [`MonitorError::SourceAuth`] if the source rejects the credentials
/// (the partial count is discarded with the call), or
/// [`MonitorError::Storage`] if the store fails.
pub async fn fetch_mentions<S, C>(
    store: &S,
    source: &C,
    brand: &str,
    channels: &[String],
    options: FetchOptions,
) -> Result<FetchReport, MonitorError>
where
    S: MentionStore + ?Sized,
    C: ContentSource + ?Sized,
{
    let mut seen_urls: HashSet<String> = store
        .query_by_brand(brand)
        .await?
        .into_iter()
        .map(|row| row.url)
        .collect();

    let mut report = FetchReport::default();

    for channel in channels {
        let posts = match source.search_channel(channel, brand, options).await {
            Ok(posts) => posts,
            Err(MonitorError::SourceAuth(message)) => {
                tracing::error!(brand, channel = %channel, error = %message, "source rejected credentials");
                return Err(MonitorError::SourceAuth(message));
            }
            Err(e) => {
                tracing::warn!(brand, channel = %channel, error = %e, "channel fetch failed; skipping");
                report.failed_channels.push(ChannelFailure {
                    channel: channel.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let channel_name = source.channel_name(channel);
        let mut channel_inserted = 0_usize;
        for post in posts {
            if seen_urls.contains(&post.url) {
                report.skipped += 1;
                continue;
            }

            let mention = NewMention {
                brand: brand.to_string(),
                source: source.source_name().to_string(),
                channel: channel_name.clone(),
                text: post.text(),
                url: post.url.clone(),
                posted_at: post.created_at,
            };

            if store.insert_if_absent(&mention).await? {
                channel_inserted += 1;
            } else {
                tracing::debug!(url = %post.url, "URL already stored; skipping");
                report.skipped += 1;
            }
            seen_urls.insert(post.url);
        }

        tracing::info!(brand, channel = %channel, inserted = channel_inserted, "channel fetched");
        report.inserted += channel_inserted;
    }

    Ok(report)
}

/// Connect to Reddit with the context's credentials and run [`fetch_mentions`].
///
/// # Errors
///
/// Returns [`MonitorError::SourceAuth`] if the token exchange is rejected,
/// [`MonitorError::Http`] if Reddit cannot be reached, and otherwise the
/// errors of [`fetch_mentions`].
pub async fn fetch_reddit_mentions<S>(
    store: &S,
    ctx: &FetchContext,
    brand: &str,
    channels: &[String],
) -> Result<FetchReport, MonitorError>
where
    S: MentionStore + ?Sized,
{
    let client =
        RedditClient::connect(&ctx.credentials, &ctx.endpoints, ctx.request_timeout_secs).await?;
    fetch_mentions(store, &client, brand, channels, ctx.options).await
}
