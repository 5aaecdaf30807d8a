//! Free-text summaries of a sentiment cohort.

use brandmon_core::labels::strip_reasoning;
use brandmon_core::{Label, Sentiment};
use brandmon_db::MentionRow;

use crate::aggregate::build_corpus;
use crate::error::MonitorError;
use crate::generation::TextGenerator;

/// Shown by callers when the generation call for a summary fails.
pub const SUMMARY_FAILED_MESSAGE: &str = "Error generating summary.";

/// Which summary to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Positive,
    Negative,
    Suggestion,
}

impl SummaryKind {
    /// The sentiment cohort the summary reads from.
    ///
    /// Suggestions are mined from negative feedback.
    #[must_use]
    pub fn cohort(self) -> Sentiment {
        match self {
            SummaryKind::Positive => Sentiment::Positive,
            SummaryKind::Negative | SummaryKind::Suggestion => Sentiment::Negative,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SummaryKind::Positive => "Positive Summary",
            SummaryKind::Negative => "Negative Summary",
            SummaryKind::Suggestion => "Suggestion Summary",
        }
    }

    /// Returned without a generation call when the cohort is empty.
    #[must_use]
    pub fn empty_message(self) -> &'static str {
        match self {
            SummaryKind::Positive => "No positive feedback found to summarize.",
            SummaryKind::Negative | SummaryKind::Suggestion => {
                "No negative feedback found to summarize."
            }
        }
    }

    #[must_use]
    pub fn build_prompt(self, corpus: &str) -> String {
        match self {
            SummaryKind::Positive => format!(
                "You are an expert customer experience analyst.\n\
                 Analyze the following POSITIVE customer feedback and identify the main strengths appreciated by customers.\n\n\
                 Provide a concise, business-oriented summary in exactly 3 bullet points covering:\n\
                 1. The top recurring points or aspects customers praised.\n\
                 2. The underlying strengths or reasons behind this positive sentiment (e.g., product quality, service experience, brand trust).\n\
                 3. The potential opportunities for the brand to further capitalize on these strengths.\n\n\
                 Be objective, avoid repetition, and use short, impactful sentences.\n\n\
                 POSITIVE CUSTOMER FEEDBACK:\n{corpus}"
            ),
            SummaryKind::Negative => format!(
                "You are an expert customer experience analyst.\n\
                 Analyze the following NEGATIVE customer feedback and identify the most common pain points.\n\n\
                 Provide a concise, business-oriented summary in exactly 3 bullet points covering:\n\
                 1. The top recurring complaints or issues customers mentioned.\n\
                 2. The underlying cause or pattern behind these issues (if visible).\n\
                 3. The potential impact or area of improvement for the brand.\n\n\
                 Be objective, avoid repetition, and use short, impactful sentences.\n\n\
                 NEGATIVE CUSTOMER FEEDBACK:\n{corpus}"
            ),
            SummaryKind::Suggestion => format!(
                "You are a product strategist. Read the following customer suggestions and feature requests.\n\
                 Analyze the underlying needs and ideas.\n\n\
                 Based only on these comments, provide a bullet-point summary of:\n\
                 1. Top Suggestions: the most common or impactful ideas users are asking for.\n\
                 2. Future Opportunities: new features or future directions the company should consider based on these suggestions.\n\n\
                 Group similar ideas together.\n\n\
                 CUSTOMER SUGGESTIONS:\n{corpus}"
            ),
        }
    }
}

impl std::str::FromStr for SummaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SummaryKind::Positive),
            "negative" => Ok(SummaryKind::Negative),
            "suggestion" | "suggestions" => Ok(SummaryKind::Suggestion),
            other => Err(format!(
                "unknown summary kind '{other}' (expected positive, negative, or suggestion)"
            )),
        }
    }
}

/// Summarize the cohort for `kind` with one generation call.
///
/// The corpus is the cohort's texts joined and cut to `max_chars`. An empty
/// cohort returns [`SummaryKind::empty_message`] without calling the model.
///
/// # Errors
///
/// Returns [`MonitorError::Generation`] if the generation call fails; callers
/// typically show [`SUMMARY_FAILED_MESSAGE`] instead.
pub async fn generate_summary<G>(
    generator: &G,
    mentions: &[MentionRow],
    kind: SummaryKind,
    max_chars: usize,
) -> Result<String, MonitorError>
where
    G: TextGenerator + ?Sized,
{
    let corpus = build_corpus(mentions, kind.cohort().as_str(), max_chars);
    if corpus.is_empty() {
        return Ok(kind.empty_message().to_string());
    }

    let response = generator.generate(&kind.build_prompt(&corpus)).await?;
    Ok(strip_reasoning(&response))
}
