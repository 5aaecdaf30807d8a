//! Reddit post conversion and channel name handling.

use chrono::{DateTime, Utc};

use super::reddit::Post;
use crate::types::SourcePost;

/// Normalize a user-supplied subreddit name (`"r/rust"`, `" rust "`) to `rust`.
///
/// Returns `None` for names Reddit would never accept.
pub(super) fn normalize_channel(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('/');
    let name = trimmed
        .strip_prefix("r/")
        .or_else(|| trimmed.strip_prefix("R/"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    let valid = !name.is_empty()
        && name.len() <= 21
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}

pub(super) fn canonical_url(permalink: &str) -> String {
    format!("https://reddit.com{permalink}")
}

/// Convert a listing entry, or `None` when it cannot become a mention.
pub(super) fn to_source_post(post: &Post) -> Option<SourcePost> {
    let Some(permalink) = post.data.permalink.as_deref() else {
        tracing::debug!(title = ?post.data.title, "dropping post without permalink");
        return None;
    };
    let Some(created_at) = post.data.created_utc.and_then(epoch_to_utc) else {
        tracing::debug!(
            permalink,
            created_utc = ?post.data.created_utc,
            "dropping post without a valid timestamp"
        );
        return None;
    };

    let title = post.data.title.as_deref().map(str::trim).unwrap_or_default();
    let body = match post.data.selftext.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() && body != "[deleted]" && body != "[removed]" => body,
        _ => "",
    };

    if title.is_empty() && body.is_empty() {
        tracing::debug!(permalink, "dropping post without text");
        return None;
    }

    Some(SourcePost {
        title: title.to_string(),
        body: body.to_string(),
        url: canonical_url(permalink),
        created_at,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

#[cfg(test)]
mod tests {
    use super::super::reddit::PostData;
    use super::*;

    fn post(title: Option<&str>, selftext: Option<&str>, permalink: Option<&str>) -> Post {
        Post {
            data: PostData {
                title: title.map(ToString::to_string),
                selftext: selftext.map(ToString::to_string),
                permalink: permalink.map(ToString::to_string),
                created_utc: Some(1_700_000_000.0),
            },
        }
    }

    #[test]
    fn channel_names_accept_common_spellings() {
        assert_eq!(normalize_channel("rust").as_deref(), Some("rust"));
        assert_eq!(normalize_channel(" r/ChatGPT ").as_deref(), Some("ChatGPT"));
        assert_eq!(normalize_channel("/r/OpenAI/").as_deref(), Some("OpenAI"));
    }

    #[test]
    fn channel_names_reject_garbage() {
        assert!(normalize_channel("").is_none());
        assert!(normalize_channel("   ").is_none());
        assert!(normalize_channel("two words").is_none());
        assert!(normalize_channel("../etc").is_none());
    }

    #[test]
    fn post_text_and_url_are_built_from_listing_fields() {
        let p = post(
            Some("Acme skates"),
            Some("They exploded again."),
            Some("/r/looneytunes/comments/abc/acme_skates/"),
        );
        let sp = to_source_post(&p).expect("post should convert");
        assert_eq!(sp.url, "https://reddit.com/r/looneytunes/comments/abc/acme_skates/");
        assert_eq!(sp.text(), "Acme skates They exploded again.");
        assert_eq!(sp.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn removed_body_keeps_title_only() {
        let p = post(Some("Acme anvil"), Some("[removed]"), Some("/r/x/comments/1/"));
        let sp = to_source_post(&p).unwrap();
        assert_eq!(sp.body, "");
        assert_eq!(sp.text(), "Acme anvil");
    }

    #[test]
    fn post_without_permalink_is_skipped() {
        assert!(to_source_post(&post(Some("t"), None, None)).is_none());
    }

    #[test]
    fn post_without_valid_timestamp_is_skipped() {
        let mut p = post(Some("Acme anvil"), None, Some("/r/x/comments/1/"));
        p.data.created_utc = None;
        assert!(to_source_post(&p).is_none());

        p.data.created_utc = Some(-5.0);
        assert!(to_source_post(&p).is_none());
    }

    #[test]
    fn post_without_any_text_is_skipped() {
        assert!(to_source_post(&post(Some("  "), Some("[deleted]"), Some("/r/x/1/"))).is_none());
    }

    #[test]
    fn fractional_epoch_keeps_subsecond_precision() {
        let ts = epoch_to_utc(1_700_000_000.5).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
        assert!(epoch_to_utc(f64::NAN).is_none());
        assert!(epoch_to_utc(-1.0).is_none());
    }
}
