//! Reddit API content source (client-credentials OAuth).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::MonitorError;
use crate::types::{FetchOptions, RedditCredentials, RedditEndpoints, SourcePost};

use super::reddit_helpers::{normalize_channel, to_source_post};
use super::ContentSource;

/// Reddit caps a single listing page at 100 items.
const MAX_PAGE_LIMIT: usize = 100;

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// Reddit search listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Post {
    pub(super) data: PostData,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostData {
    pub(super) title: Option<String>,
    pub(super) selftext: Option<String>,
    pub(super) permalink: Option<String>,
    pub(super) created_utc: Option<f64>,
}

/// Reddit API client holding a valid access token.
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    api_base: String,
}

impl RedditClient {
    /// Exchange client credentials for an application-only access token.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::SourceAuth`] if Reddit rejects the credentials,
    /// or [`MonitorError::Http`] on network failure or any other error status.
    pub async fn connect(
        credentials: &RedditCredentials,
        endpoints: &RedditEndpoints,
        timeout_secs: u64,
    ) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(credentials.user_agent.clone())
            .build()?;

        let token = Self::fetch_token(&client, credentials, &endpoints.auth_base).await?;

        Ok(Self {
            client,
            token,
            user_agent: credentials.user_agent.clone(),
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_token(
        client: &reqwest::Client,
        credentials: &RedditCredentials,
        auth_base: &str,
    ) -> Result<String, MonitorError> {
        let url = format!("{}/api/v1/access_token", auth_base.trim_end_matches('/'));
        let response = client
            .post(url)
            .header("User-Agent", &credentials.user_agent)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(MonitorError::SourceAuth(format!(
                "token exchange rejected with status {status}"
            )));
        }
        let response = response.error_for_status()?;

        let token_resp: TokenResponse = response.json().await?;
        match (token_resp.access_token, token_resp.error) {
            (Some(token), _) if !token.is_empty() => Ok(token),
            (_, Some(error)) => Err(MonitorError::SourceAuth(format!(
                "token exchange returned error '{error}'"
            ))),
            _ => Err(MonitorError::SourceAuth(
                "token exchange returned no access token".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ContentSource for RedditClient {
    fn source_name(&self) -> &'static str {
        "reddit"
    }

    /// `"r/Acme"` is stored as `Acme`, the subreddit actually searched.
    fn channel_name(&self, channel: &str) -> String {
        normalize_channel(channel).unwrap_or_else(|| channel.trim().to_string())
    }

    /// Search one subreddit for `query`, newest first, within the recency window.
    ///
    /// A 401 means the token is no longer accepted and is reported as
    /// [`MonitorError::SourceAuth`]. Every other failure (banned, private, or
    /// unknown subreddit, transport error, malformed listing) is scoped to the
    /// channel.
    async fn search_channel(
        &self,
        channel: &str,
        query: &str,
        options: FetchOptions,
    ) -> Result<Vec<SourcePost>, MonitorError> {
        let Some(name) = normalize_channel(channel) else {
            return Err(MonitorError::channel(channel, "invalid subreddit name"));
        };

        let limit = options.limit.clamp(1, MAX_PAGE_LIMIT);
        let params: [(&str, String); 6] = [
            ("q", query.to_string()),
            ("restrict_sr", "true".to_string()),
            ("sort", "new".to_string()),
            ("limit", limit.to_string()),
            ("t", options.window.as_str().to_string()),
            ("raw_json", "1".to_string()),
        ];

        let response = self
            .client
            .get(format!("{}/r/{name}/search", self.api_base))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", &self.user_agent)
            .query(&params)
            .send()
            .await
            .map_err(|e| MonitorError::channel(&name, format!("request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(MonitorError::SourceAuth(format!(
                "search in r/{name} rejected the access token"
            )));
        }
        if !status.is_success() {
            return Err(MonitorError::channel(
                &name,
                format!("search returned status {status}"),
            ));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| MonitorError::channel(&name, format!("unexpected response: {e}")))?;

        let posts: Vec<SourcePost> = listing
            .data
            .children
            .iter()
            .filter_map(to_source_post)
            .take(options.limit)
            .collect();

        tracing::debug!(
            channel = %name,
            query,
            posts = posts.len(),
            "searched subreddit"
        );

        Ok(posts)
    }
}
