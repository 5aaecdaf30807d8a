//! Shared domain types and configuration for brandmon.

pub mod app_config;
pub mod config;
pub mod labels;
pub mod mention;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use labels::{
    normalize_sentiment, normalize_topic, normalize_urgency, topic_labels, Label, Sentiment,
    Topic, Urgency, UNRECOGNIZED_LABEL,
};
pub use mention::{MentionLabels, NewMention, RecencyWindow};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
