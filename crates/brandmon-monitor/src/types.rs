use brandmon_core::{AppConfig, RecencyWindow};
use chrono::{DateTime, Utc};

/// One candidate post returned by a content source search.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePost {
    pub title: String,
    pub body: String,
    /// Canonical external link, already absolute.
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl SourcePost {
    /// Title and body joined by a single space, trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}", self.title.trim(), self.body.trim())
            .trim()
            .to_string()
    }
}

/// Per-channel search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum results requested per channel.
    pub limit: usize,
    pub window: RecencyWindow,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            window: RecencyWindow::Day,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            limit: config.fetch_limit,
            window: config.fetch_window,
        }
    }
}

/// A channel that was skipped during a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFailure {
    pub channel: String,
    pub message: String,
}

/// Outcome of one fetch call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Newly stored mentions.
    pub inserted: usize,
    /// Candidates dropped because their URL was already known.
    pub skipped: usize,
    pub failed_channels: Vec<ChannelFailure>,
}

/// Reddit script-app credentials.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Everything a fetch needs that would otherwise live in ambient session state.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub credentials: RedditCredentials,
    pub options: FetchOptions,
    pub request_timeout_secs: u64,
    pub endpoints: RedditEndpoints,
}

/// Base URLs for the Reddit OAuth and API hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditEndpoints {
    pub auth_base: String,
    pub api_base: String,
}

impl Default for RedditEndpoints {
    fn default() -> Self {
        Self {
            auth_base: "https://www.reddit.com".to_string(),
            api_base: "https://oauth.reddit.com".to_string(),
        }
    }
}

/// Enrichment tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Mentions classified at once. Clamped to at least 1.
    pub concurrency: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// What happened to one pending mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// All three labels were produced and committed.
    Analyzed,
    /// At least one classification failed; nothing was written.
    LeftPending { failed: Vec<&'static str> },
}

/// Progress event emitted after each pending mention is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichProgress {
    /// Items finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub mention_id: i64,
    pub outcome: EnrichOutcome,
}

/// Totals for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Size of the pending set at the start of the pass.
    pub total: usize,
    pub analyzed: usize,
    pub still_pending: usize,
}
