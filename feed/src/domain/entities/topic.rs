//! Topic and sort order
//!
//! A topic is the community a feed is drawn from (a subreddit, or a
//! `+`-joined multireddit). Sort order selects the listing endpoint.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TOPIC;
use crate::error::DomainError;

/// Normalized community name, e.g. `rust` or `rust+programming`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    /// Parse user or route input. Accepts `rust`, `r/rust` and `/r/rust/`.
    /// Empty input yields the default topic.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        // Prefix first, so a bare `r/` is empty rather than the community `r`
        let trimmed = input.trim().trim_start_matches('/');
        let name = trimmed
            .strip_prefix("r/")
            .or_else(|| trimmed.strip_prefix("R/"))
            .unwrap_or(trimmed)
            .trim_matches('/');

        if name.is_empty() {
            return Ok(Self::default());
        }

        if name.starts_with('+')
            || name.ends_with('+')
            || name.contains("++")
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+')
        {
            return Err(DomainError::Validation(format!("Invalid topic: {}", input)));
        }

        Ok(Self(name.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Topic {
    fn default() -> Self {
        Self(DEFAULT_TOPIC.to_string())
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r/{}", self.0)
    }
}

impl std::str::FromStr for Topic {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Listing sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Hot,
    New,
    Top,
    Rising,
    Controversial,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Hot,
        SortOrder::New,
        SortOrder::Top,
        SortOrder::Rising,
        SortOrder::Controversial,
    ];

    /// The sort after this one, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Hot => write!(f, "hot"),
            SortOrder::New => write!(f, "new"),
            SortOrder::Top => write!(f, "top"),
            SortOrder::Rising => write!(f, "rising"),
            SortOrder::Controversial => write!(f, "controversial"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(SortOrder::Hot),
            "new" => Ok(SortOrder::New),
            "top" => Ok(SortOrder::Top),
            "rising" => Ok(SortOrder::Rising),
            "controversial" => Ok(SortOrder::Controversial),
            _ => Err(DomainError::Validation(format!("Unknown sort order: {}", s))),
        }
    }
}
