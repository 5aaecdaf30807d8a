//! Reporting aggregates over stored mentions.
//!
//! Every count runs over the analyzed subset (mentions with a sentiment).
//! Labels are re-normalized on read so rows written by older builds or by
//! hand still land in the canonical buckets.

use std::collections::BTreeMap;

use brandmon_core::{normalize_sentiment, topic_labels, Label, Sentiment};
use brandmon_db::MentionRow;

/// Default character budget for a summary corpus.
pub const DEFAULT_CORPUS_MAX_CHARS: usize = 4000;

/// Separator placed between mention texts in a summary corpus.
pub const CORPUS_SEPARATOR: &str = "\n---\n";

/// Mentions that have been classified, in input order.
pub fn analyzed(mentions: &[MentionRow]) -> impl Iterator<Item = &MentionRow> {
    mentions.iter().filter(|m| !m.is_pending())
}

/// Mentions still waiting for classification, in input order.
pub fn pending(mentions: &[MentionRow]) -> impl Iterator<Item = &MentionRow> {
    mentions.iter().filter(|m| m.is_pending())
}

/// Count of analyzed mentions per sentiment label.
#[must_use]
pub fn sentiment_distribution(mentions: &[MentionRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for mention in analyzed(mentions) {
        if let Some(raw) = mention.sentiment.as_deref() {
            *counts.entry(normalize_sentiment(raw)).or_insert(0) += 1;
        }
    }
    counts
}

/// Count of analyzed mentions per topic label.
///
/// A multi-label topic such as `"Feature Request, Other"` adds one to each of
/// its labels. An analyzed mention with no topic counts nowhere.
#[must_use]
pub fn topic_frequency(mentions: &[MentionRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for mention in analyzed(mentions) {
        let Some(raw) = mention.topic.as_deref() else {
            continue;
        };
        for topic in topic_labels(raw) {
            *counts.entry(topic.as_str().to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Analyzed mentions whose sentiment is `label`, in input order.
///
/// A known label is compared after normalization, so `"positive"` and
/// `"Positive"` select the same mentions. Any other label must match the
/// stored value exactly (ignoring case), so `"Happy"` selects nothing unless
/// a row literally says `Happy`.
#[must_use]
pub fn filter_by_sentiment<'a>(mentions: &'a [MentionRow], label: &str) -> Vec<&'a MentionRow> {
    match Sentiment::parse(label) {
        Some(wanted) => analyzed(mentions)
            .filter(|m| {
                m.sentiment
                    .as_deref()
                    .is_some_and(|s| normalize_sentiment(s) == wanted.as_str())
            })
            .collect(),
        None => {
            let wanted = label.trim();
            analyzed(mentions)
                .filter(|m| {
                    m.sentiment
                        .as_deref()
                        .is_some_and(|s| s.trim().eq_ignore_ascii_case(wanted))
                })
                .collect()
        }
    }
}

/// Texts of the mentions with sentiment `label`, joined by [`CORPUS_SEPARATOR`]
/// and cut to at most `max_chars` characters.
///
/// Returns an empty string when no mention matches.
#[must_use]
pub fn build_corpus(mentions: &[MentionRow], label: &str, max_chars: usize) -> String {
    let joined = filter_by_sentiment(mentions, label)
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(CORPUS_SEPARATOR);
    truncate_chars(&joined, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn row(id: i64, text: &str, sentiment: Option<&str>, topic: Option<&str>) -> MentionRow {
        MentionRow {
            id,
            public_id: Uuid::new_v4(),
            brand: "Acme".to_string(),
            source: "reddit".to_string(),
            channel: "acme".to_string(),
            text: text.to_string(),
            url: format!("https://reddit.com/r/acme/comments/{id}/"),
            posted_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            sentiment: sentiment.map(ToString::to_string),
            topic: topic.map(ToString::to_string),
            urgency: sentiment.map(|_| "Low Urgency".to_string()),
            analyzed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn distribution_counts_only_analyzed_rows() {
        let rows = vec![
            row(1, "a", Some("Positive"), Some("Positive Review")),
            row(2, "b", Some("Positive"), Some("Other")),
            row(3, "c", None, None),
        ];
        let dist = sentiment_distribution(&rows);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.get("Positive"), Some(&2));
    }

    #[test]
    fn distribution_buckets_unknown_labels() {
        let rows = vec![
            row(1, "a", Some("negative"), None),
            row(2, "b", Some("Mixed feelings"), None),
        ];
        let dist = sentiment_distribution(&rows);
        assert_eq!(dist.get("Negative"), Some(&1));
        assert_eq!(dist.get("Unrecognized"), Some(&1));
    }

    #[test]
    fn multi_label_topic_counts_in_each_bucket() {
        let rows = vec![
            row(1, "a", Some("Neutral"), Some("Feature Request, Other")),
            row(2, "b", Some("Negative"), Some("Feature Request")),
        ];
        let freq = topic_frequency(&rows);
        assert_eq!(freq.get("Feature Request"), Some(&2));
        assert_eq!(freq.get("Other"), Some(&1));
    }

    #[test]
    fn pending_rows_do_not_contribute_topics() {
        let rows = vec![row(1, "a", None, Some("PR/News"))];
        assert!(topic_frequency(&rows).is_empty());
    }

    #[test]
    fn filter_preserves_input_order() {
        let rows = vec![
            row(3, "third", Some("Negative"), None),
            row(1, "first", Some("Positive"), None),
            row(2, "second", Some("Negative"), None),
        ];
        let ids: Vec<i64> = filter_by_sentiment(&rows, "Negative")
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn unknown_filter_label_matches_nothing() {
        let rows = vec![
            row(1, "a", Some("Unrecognized"), None),
            row(2, "b", Some("Positive"), None),
        ];
        assert!(filter_by_sentiment(&rows, "Happy").is_empty());
    }

    #[test]
    fn filter_label_is_case_insensitive() {
        let rows = vec![
            row(1, "a", Some("Unrecognized"), None),
            row(2, "b", Some("positive"), None),
        ];
        let ids = |label| {
            filter_by_sentiment(&rows, label)
                .iter()
                .map(|m| m.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("POSITIVE"), vec![2]);
        assert_eq!(ids("unrecognized"), vec![1]);
    }

    #[test]
    fn partition_helpers_split_on_sentiment() {
        let rows = vec![row(1, "a", Some("Neutral"), None), row(2, "b", None, None)];
        assert_eq!(analyzed(&rows).count(), 1);
        assert_eq!(pending(&rows).map(|m| m.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn corpus_joins_with_separator() {
        let rows = vec![
            row(1, "love it", Some("Positive"), None),
            row(2, "hate it", Some("Negative"), None),
            row(3, "great", Some("Positive"), None),
        ];
        assert_eq!(
            build_corpus(&rows, "Positive", DEFAULT_CORPUS_MAX_CHARS),
            "love it\n---\ngreat"
        );
        assert_eq!(build_corpus(&rows, "Neutral", DEFAULT_CORPUS_MAX_CHARS), "");
    }

    #[test]
    fn corpus_truncates_on_char_boundary() {
        let rows = vec![row(1, "héllo wörld", Some("Positive"), None)];
        assert_eq!(build_corpus(&rows, "Positive", 4), "héll");

        let long = "x".repeat(5000);
        let rows = vec![row(1, &long, Some("Positive"), None)];
        assert_eq!(
            build_corpus(&rows, "Positive", DEFAULT_CORPUS_MAX_CHARS)
                .chars()
                .count(),
            4000
        );
    }
}
