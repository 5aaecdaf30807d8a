use brandmon_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Credentials were rejected. Fatal for the whole fetch call.
    #[error("source authentication failed: {0}")]
    SourceAuth(String),

    /// One channel could not be searched. The fetch skips it and continues.
    #[error("channel '{channel}' unavailable: {message}")]
    SourceChannel { channel: String, message: String },

    /// The text-generation service failed or returned an unusable body.
    #[error("generation error: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

impl MonitorError {
    pub(crate) fn channel(channel: &str, message: impl Into<String>) -> Self {
        Self::SourceChannel {
            channel: channel.to_string(),
            message: message.into(),
        }
    }
}
