//! Brand mention monitoring pipeline.
//!
//! Searches Reddit for brand mentions, stores novel posts through a
//! [`brandmon_db::MentionStore`], labels pending mentions with a local text
//! generation model, and aggregates the labels into reports and summaries.

pub mod aggregate;
pub mod classify;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod generation;
pub mod sources;
pub mod summary;
pub mod types;

pub use aggregate::{
    analyzed, build_corpus, filter_by_sentiment, pending, sentiment_distribution,
    topic_frequency, CORPUS_SEPARATOR, DEFAULT_CORPUS_MAX_CHARS,
};
pub use classify::{build_prompt, Axis, Classifier};
pub use enrich::enrich_pending;
pub use error::MonitorError;
pub use fetch::{fetch_mentions, fetch_reddit_mentions};
pub use generation::{OllamaClient, TextGenerator};
pub use sources::{ContentSource, RedditClient};
pub use summary::{generate_summary, SummaryKind, SUMMARY_FAILED_MESSAGE};
pub use types::{
    ChannelFailure, EnrichOptions, EnrichOutcome, EnrichProgress, EnrichReport, FetchContext,
    FetchOptions, FetchReport, RedditCredentials, RedditEndpoints, SourcePost,
};
