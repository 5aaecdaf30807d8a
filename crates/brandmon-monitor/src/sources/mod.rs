//! Content source abstractions.

mod reddit;
mod reddit_helpers;

pub use reddit::RedditClient;

use async_trait::async_trait;

use crate::error::MonitorError;
use crate::types::{FetchOptions, SourcePost};

/// A searchable content platform split into channels.
///
/// Implementations return [`MonitorError::SourceAuth`] when credentials are
/// rejected and [`MonitorError::SourceChannel`] when only the requested
/// channel is unavailable.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Identifier stored in `mentions.source`.
    fn source_name(&self) -> &'static str;

    /// Name stored in `mentions.channel` for a user-supplied `channel`.
    ///
    /// Must agree with the name `search_channel` actually searches.
    fn channel_name(&self, channel: &str) -> String {
        channel.trim().to_string()
    }

    /// Newest posts in `channel` matching `query`, bounded by `options`.
    async fn search_channel(
        &self,
        channel: &str,
        query: &str,
        options: FetchOptions,
    ) -> Result<Vec<SourcePost>, MonitorError>;
}
