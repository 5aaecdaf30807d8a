//! Per-axis mention classification prompts.

use crate::error::MonitorError;
use crate::generation::TextGenerator;

const SENTIMENT_INSTRUCTION: &str = "Analyze the sentiment of the following text. \
Is it Positive, Negative, or Neutral? Answer with only one word.";

const TOPIC_INSTRUCTION: &str = "\
You are a text analysis engine. Read the following text and assign the single best-fitting category from the list below.

Categories & Definitions:

* Customer Service Issue: Problems with support, billing, shipping, or account interaction.
* Product Defect/Bug: The product is broken, crashing, or not working as intended.
* High Price Complaint: Feedback that the product or service is too expensive.
* Positive Review: General praise, compliments, or success stories.
* Competitor Comparison: The text explicitly mentions a competitor.
* Feature Request: A suggestion for a new feature or an improvement to an existing one.
* PR/News: Text that appears to be a press release, news article, or public announcement.
* Other: Any other topic that does not clearly fit one of the categories above (e.g., general inquiry, spam, wrong email).

Rules:
1. Choose exactly one category.
2. If none of the specific categories is a good match, you must use 'Other'.
3. Output only the category name.";

const URGENCY_INSTRUCTION: &str = "\
You are a PR crisis manager. Read this text. Is this a 'High Urgency' issue \
(e.g., safety risk, potential PR crisis, going viral) or a 'Low Urgency' issue \
(e.g., single user complaint, question)? Answer with 'High Urgency' or 'Low Urgency'.";

/// One classification axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Sentiment,
    Topic,
    Urgency,
}

impl Axis {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Sentiment => "sentiment",
            Axis::Topic => "topic",
            Axis::Urgency => "urgency",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            Axis::Sentiment => SENTIMENT_INSTRUCTION,
            Axis::Topic => TOPIC_INSTRUCTION,
            Axis::Urgency => URGENCY_INSTRUCTION,
        }
    }
}

/// Build the full prompt for one axis: instruction, blank line, then the text.
#[must_use]
pub fn build_prompt(axis: Axis, text: &str) -> String {
    format!("{}\n\nText to analyze:\n{text}", axis.instruction())
}

/// Labels mention text on the sentiment, topic, and urgency axes.
///
/// Each call is a single generation request with no retry. Responses are
/// returned trimmed but otherwise raw; validation against the category sets
/// happens in `brandmon_core::labels`.
pub struct Classifier<G> {
    generator: G,
}

impl<G: TextGenerator> Classifier<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// # Errors
    ///
    /// Returns [`MonitorError::Generation`] if the service call fails.
    pub async fn classify_sentiment(&self, text: &str) -> Result<String, MonitorError> {
        self.classify(Axis::Sentiment, text).await
    }

    /// # Errors
    ///
    /// Returns [`MonitorError::Generation`] if the service call fails.
    pub async fn classify_topic(&self, text: &str) -> Result<String, MonitorError> {
        self.classify(Axis::Topic, text).await
    }

    /// # Errors
    ///
    /// Returns [`MonitorError::Generation`] if the service call fails.
    pub async fn classify_urgency(&self, text: &str) -> Result<String, MonitorError> {
        self.classify(Axis::Urgency, text).await
    }

    /// Returns the trimmed raw answer, which may be empty. Labels are
    /// normalized by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Generation`] if the service call fails.
    pub async fn classify(&self, axis: Axis, text: &str) -> Result<String, MonitorError> {
        let prompt = build_prompt(axis, text);
        let response = self.generator.generate(&prompt).await?;
        Ok(response.trim().to_string())
    }
}
