use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched post normalized into a store-ready record.
///
/// Carries only the immutable fields; labels are written later by enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMention {
    /// Keyword the post was fetched for.
    pub brand: String,
    /// Origin platform, e.g. `reddit`.
    pub source: String,
    /// Subdivision of the platform that was searched (subreddit name).
    pub channel: String,
    /// Title and body concatenated.
    pub text: String,
    /// Canonical link. Globally unique across the store.
    pub url: String,
    pub posted_at: DateTime<Utc>,
}

/// The three classification labels, committed together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionLabels {
    pub sentiment: String,
    pub topic: String,
    pub urgency: String,
}

/// How far back a channel search reaches.
///
/// Values map one-to-one onto Reddit's `t` search parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyWindow {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl RecencyWindow {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecencyWindow::Hour => "hour",
            RecencyWindow::Day => "day",
            RecencyWindow::Week => "week",
            RecencyWindow::Month => "month",
            RecencyWindow::Year => "year",
            RecencyWindow::All => "all",
        }
    }
}

impl std::fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(RecencyWindow::Hour),
            "day" => Ok(RecencyWindow::Day),
            "week" => Ok(RecencyWindow::Week),
            "month" => Ok(RecencyWindow::Month),
            "year" => Ok(RecencyWindow::Year),
            "all" => Ok(RecencyWindow::All),
            other => Err(format!(
                "unknown recency window '{other}' (expected hour, day, week, month, year, or all)"
            )),
        }
    }
}
