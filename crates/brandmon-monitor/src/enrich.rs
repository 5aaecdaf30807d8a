//! Enrichment of pending mentions with classification labels.

use brandmon_core::{
    normalize_sentiment, normalize_topic, normalize_urgency, MentionLabels, UNRECOGNIZED_LABEL,
};
use brandmon_db::{MentionRow, MentionStore};
use futures::stream::{self, StreamExt};

use crate::classify::{Axis, Classifier};
use crate::error::MonitorError;
use crate::generation::TextGenerator;
use crate::types::{EnrichOptions, EnrichOutcome, EnrichProgress, EnrichReport};

/// Classify every pending mention of `brand` and commit complete label sets.
///
/// The pending set is every mention without a sentiment, in store order
/// (newest first). Each mention gets all three classifications; labels are
/// written only when all three succeed, otherwise the mention stays pending
/// for the next pass. Up to `options.concurrency` mentions are in flight at
/// once. `on_progress` fires after every mention.
///
/// Dropping the returned future between items is safe: each commit is a
/// single atomic update.
///
/// # Errors
///
/// Returns [`MonitorError::Storage`] if the pending query or any label update
/// fails. Mentions committed before the failure stay committed.
pub async fn enrich_pending<S, G, F>(
    store: &S,
    classifier: &Classifier<G>,
    brand: &str,
    options: EnrichOptions,
    mut on_progress: F,
) -> Result<EnrichReport, MonitorError>
where
    S: MentionStore + ?Sized,
    G: TextGenerator,
    F: FnMut(&EnrichProgress),
{
    let pending: Vec<MentionRow> = store
        .query_by_brand(brand)
        .await?
        .into_iter()
        .filter(MentionRow::is_pending)
        .collect();

    let total = pending.len();
    let mut report = EnrichReport {
        total,
        ..EnrichReport::default()
    };

    if pending.is_empty() {
        tracing::info!(brand, "no pending mentions to enrich");
        return Ok(report);
    }

    tracing::info!(brand, pending = total, concurrency = options.concurrency, "enriching mentions");

    let mut results = stream::iter(pending.iter().map(|m| enrich_one(store, classifier, m)))
        .buffer_unordered(options.concurrency.max(1));

    let mut completed = 0_usize;
    while let Some(result) = results.next().await {
        let (mention_id, outcome) = result?;
        completed += 1;
        match outcome {
            EnrichOutcome::Analyzed => report.analyzed += 1,
            EnrichOutcome::LeftPending { .. } => report.still_pending += 1,
        }
        on_progress(&EnrichProgress {
            completed,
            total,
            mention_id,
            outcome,
        });
    }

    tracing::info!(
        brand,
        analyzed = report.analyzed,
        still_pending = report.still_pending,
        "enrichment pass complete"
    );

    Ok(report)
}

async fn enrich_one<S, G>(
    store: &S,
    classifier: &Classifier<G>,
    mention: &MentionRow,
) -> Result<(i64, EnrichOutcome), MonitorError>
where
    S: MentionStore + ?Sized,
    G: TextGenerator,
{
    let sentiment = classifier.classify_sentiment(&mention.text).await;
    let topic = classifier.classify_topic(&mention.text).await;
    let urgency = classifier.classify_urgency(&mention.text).await;

    let mut failed = Vec::new();
    for (axis, result) in [
        (Axis::Sentiment, &sentiment),
        (Axis::Topic, &topic),
        (Axis::Urgency, &urgency),
    ] {
        if let Err(e) = result {
            tracing::warn!(
                mention_id = mention.id,
                axis = axis.as_str(),
                error = %e,
                "classification failed; mention stays pending"
            );
            failed.push(axis.as_str());
        }
    }

    let (Ok(sentiment), Ok(topic), Ok(urgency)) = (sentiment, topic, urgency) else {
        return Ok((mention.id, EnrichOutcome::LeftPending { failed }));
    };

    let labels = MentionLabels {
        sentiment: normalize_sentiment(&sentiment),
        topic: normalize_topic(&topic),
        urgency: normalize_urgency(&urgency),
    };

    if labels.sentiment == UNRECOGNIZED_LABEL || labels.urgency == UNRECOGNIZED_LABEL {
        tracing::warn!(
            mention_id = mention.id,
            raw_sentiment = %sentiment,
            raw_urgency = %urgency,
            "model answered outside the category set"
        );
    }

    store.update_labels(mention.id, &labels).await?;
    tracing::debug!(
        mention_id = mention.id,
        sentiment = %labels.sentiment,
        topic = %labels.topic,
        urgency = %labels.urgency,
        "mention analyzed"
    );

    Ok((mention.id, EnrichOutcome::Analyzed))
}
