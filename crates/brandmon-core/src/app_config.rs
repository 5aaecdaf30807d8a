use crate::mention::RecencyWindow;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub ollama_url: String,
    pub model: String,
    pub generation_timeout_secs: u64,
    pub enrich_concurrency: usize,
    pub fetch_limit: usize,
    pub fetch_window: RecencyWindow,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub summary_max_chars: usize,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("ollama_url", &self.ollama_url)
            .field("model", &self.model)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .field("enrich_concurrency", &self.enrich_concurrency)
            .field("fetch_limit", &self.fetch_limit)
            .field("fetch_window", &self.fetch_window)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("summary_max_chars", &self.summary_max_chars)
            .field("reddit_client_id", &self.reddit_client_id)
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
