//! Unified error types for redstream
//!
//! This module defines error types for each layer:
//! - `DomainError`: Invalid domain values (topics, sort orders)
//! - `FetchError`: Content API client errors
//! - `ConfigError`: Environment configuration errors

use thiserror::Error;

/// Domain layer errors - pure validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Content API client errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Topic not found: r/{0}")]
    TopicNotFound(String),

    #[error("Topic is private or banned: r/{0}")]
    Forbidden(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl FetchError {
    /// Short message suitable for the feed's error row
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Request(e) if e.is_timeout() => "Request timed out".to_string(),
            FetchError::Request(_) => "Could not reach the content API".to_string(),
            FetchError::Api { status, .. } => format!("Content API returned {}", status),
            FetchError::TopicNotFound(topic) => format!("r/{} does not exist", topic),
            FetchError::Forbidden(topic) => format!("r/{} is private or banned", topic),
            FetchError::RateLimited => "Rate limited, try again shortly".to_string(),
            FetchError::Deserialization(_) => "Unexpected response from the content API".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
