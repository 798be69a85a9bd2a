use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://www.reddit.com";
pub const DEFAULT_TOPIC: &str = "all";
pub const DEFAULT_PAGE_LIMIT: u32 = 25;
/// Reddit caps listing pages at 100 items
pub const MAX_PAGE_LIMIT: u32 = 100;
/// Rows left below the viewport before the next page is requested
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the listing API
    pub api_url: String,
    pub user_agent: String,
    /// Topic shown when none is given on the command line
    pub default_topic: String,
    /// Items requested per page
    pub page_limit: u32,
    pub scroll_threshold: u32,
    pub request_timeout: Duration,
    /// Where the interactive UI writes its logs
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
            default_topic: DEFAULT_TOPIC.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: env::temp_dir().join("redstream.log"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_limit = match lookup("REDSTREAM_PAGE_LIMIT") {
            Some(raw) => parse_page_limit(&raw)?,
            None => defaults.page_limit,
        };

        // Must be positive: `near_end(0)` never holds
        let scroll_threshold = match lookup("REDSTREAM_SCROLL_THRESHOLD") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(rows) if rows > 0 => rows,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "REDSTREAM_SCROLL_THRESHOLD",
                        value: raw,
                    })
                }
            },
            None => defaults.scroll_threshold,
        };

        let request_timeout = match lookup("REDSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "REDSTREAM_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_url: lookup("REDSTREAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            user_agent: lookup("REDSTREAM_USER_AGENT").unwrap_or(defaults.user_agent),
            default_topic: lookup("REDSTREAM_DEFAULT_TOPIC").unwrap_or(defaults.default_topic),
            page_limit,
            scroll_threshold,
            request_timeout,
            log_file: lookup("REDSTREAM_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        })
    }
}

/// Parse a page limit, accepting 1..=100
pub fn parse_page_limit(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(limit) if (1..=MAX_PAGE_LIMIT).contains(&limit) => Ok(limit),
        _ => Err(ConfigError::Invalid {
            key: "REDSTREAM_PAGE_LIMIT",
            value: raw.to_string(),
        }),
    }
}

fn default_user_agent() -> String {
    format!("redstream/{}", env!("CARGO_PKG_VERSION"))
}
