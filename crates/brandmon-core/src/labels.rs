//! Fixed classification category sets and normalization of raw model output.
//!
//! The generation service is prompted to answer with exactly one category, but
//! its output is untrusted text. Everything written to the store or counted by
//! the aggregator passes through the `normalize_*` functions here.

use std::sync::LazyLock;

use regex::Regex;

/// Stored when a sentiment or urgency response matches no known category.
pub const UNRECOGNIZED_LABEL: &str = "Unrecognized";

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("valid think-block regex"));

const TRIM_CHARS: &[char] = &['"', '\'', '*', '`', '.', '!', ':', '-', '[', ']', '(', ')'];

/// A closed set of category labels.
pub trait Label: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Match a single raw label against the category set.
    ///
    /// Case-insensitive. Accepts the label followed by trailing commentary
    /// (`"Positive - the user is happy"`) and a leading `"Key:"` prefix.
    fn parse(raw: &str) -> Option<Self> {
        let cleaned = clean_fragment(raw);
        if cleaned.is_empty() {
            return None;
        }
        match_label(&cleaned, Self::ALL).or_else(|| {
            let (_, tail) = cleaned.rsplit_once(':')?;
            match_label(&clean_fragment(tail), Self::ALL)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Label for Sentiment {
    const ALL: &'static [Self] = &[Self::Positive, Self::Negative, Self::Neutral];

    fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    CustomerServiceIssue,
    ProductDefect,
    HighPriceComplaint,
    PositiveReview,
    CompetitorComparison,
    FeatureRequest,
    PrNews,
    Other,
}

impl Label for Topic {
    const ALL: &'static [Self] = &[
        Self::CustomerServiceIssue,
        Self::ProductDefect,
        Self::HighPriceComplaint,
        Self::PositiveReview,
        Self::CompetitorComparison,
        Self::FeatureRequest,
        Self::PrNews,
        Self::Other,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Topic::CustomerServiceIssue => "Customer Service Issue",
            Topic::ProductDefect => "Product Defect/Bug",
            Topic::HighPriceComplaint => "High Price Complaint",
            Topic::PositiveReview => "Positive Review",
            Topic::CompetitorComparison => "Competitor Comparison",
            Topic::FeatureRequest => "Feature Request",
            Topic::PrNews => "PR/News",
            Topic::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    High,
    Low,
}

impl Label for Urgency {
    const ALL: &'static [Self] = &[Self::High, Self::Low];

    fn as_str(self) -> &'static str {
        match self {
            Urgency::High => "High Urgency",
            Urgency::Low => "Low Urgency",
        }
    }
}

/// Remove `<think>…</think>` reasoning blocks and surrounding whitespace.
#[must_use]
pub fn strip_reasoning(raw: &str) -> String {
    THINK_BLOCK.replace_all(raw, "").trim().to_string()
}

/// Strip reasoning blocks and return the first non-empty line of a response.
#[must_use]
pub fn clean_response(raw: &str) -> String {
    strip_reasoning(raw)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Canonical sentiment label for a raw response, or [`UNRECOGNIZED_LABEL`].
#[must_use]
pub fn normalize_sentiment(raw: &str) -> String {
    Sentiment::parse(&clean_response(raw))
        .map_or(UNRECOGNIZED_LABEL, Sentiment::as_str)
        .to_string()
}

/// Canonical urgency label for a raw response, or [`UNRECOGNIZED_LABEL`].
#[must_use]
pub fn normalize_urgency(raw: &str) -> String {
    Urgency::parse(&clean_response(raw))
        .map_or(UNRECOGNIZED_LABEL, Urgency::as_str)
        .to_string()
}

/// Split a (possibly multi-label) topic string into canonical topics.
///
/// Unrecognized parts become [`Topic::Other`]. Order of first appearance is
/// kept and duplicates are dropped. Never returns an empty list.
#[must_use]
pub fn topic_labels(raw: &str) -> Vec<Topic> {
    let line = clean_response(raw);
    let mut topics: Vec<Topic> = Vec::new();
    for part in line.split(',') {
        if clean_fragment(part).is_empty() {
            continue;
        }
        let topic = Topic::parse(part).unwrap_or(Topic::Other);
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    if topics.is_empty() {
        topics.push(Topic::Other);
    }
    topics
}

/// Canonical topic string: [`topic_labels`] joined with `", "`.
#[must_use]
pub fn normalize_topic(raw: &str) -> String {
    topic_labels(raw)
        .into_iter()
        .map(Topic::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn clean_fragment(raw: &str) -> String {
    raw.trim().trim_matches(TRIM_CHARS).trim().to_string()
}

fn match_label<L: Label>(cleaned: &str, candidates: &[L]) -> Option<L> {
    let lower = cleaned.to_lowercase();

    if let Some(exact) = candidates
        .iter()
        .find(|l| l.as_str().to_lowercase() == lower)
    {
        return Some(*exact);
    }

    // "Positive - mostly praise" / "High Urgency because ..."
    let prefixed = candidates.iter().find(|l| {
        let label = l.as_str().to_lowercase();
        lower.starts_with(&label)
            && lower[label.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric())
    });
    if let Some(label) = prefixed {
        return Some(*label);
    }

    // Bare first word ("High" for "High Urgency"), only when unambiguous.
    let mut by_first_word = candidates.iter().filter(|l| {
        l.as_str()
            .split_whitespace()
            .next()
            .is_some_and(|w| w.to_lowercase() == lower)
    });
    match (by_first_word.next(), by_first_word.next()) {
        (Some(label), None) => Some(*label),
        _ => None,
    }
}
