//! Post domain entity
//!
//! A single listing entry. The feed treats it as opaque apart from its id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a post (the listing's short id, e.g. `1abcde`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A post in a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: u64,
    /// Path of the discussion page, relative to the site root
    pub permalink: String,
    /// Link target (same as the permalink for self posts)
    pub url: String,
    pub created_utc: DateTime<Utc>,
    pub over_18: bool,
    pub is_self: bool,
}

impl Post {
    /// Age of the post relative to `now`, in a compact form (`5m`, `3h`, `2d`)
    pub fn age(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.created_utc).num_seconds().max(0);
        match secs {
            s if s < 60 => format!("{}s", s),
            s if s < 3_600 => format!("{}m", s / 60),
            s if s < 86_400 => format!("{}h", s / 3_600),
            s if s < 31_536_000 => format!("{}d", s / 86_400),
            s => format!("{}y", s / 31_536_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_post;
    use chrono::Duration;

    #[test]
    fn age_is_compact() {
        let post = test_post("a");
        let created = post.created_utc;

        assert_eq!(post.age(created + Duration::seconds(42)), "42s");
        assert_eq!(post.age(created + Duration::minutes(5)), "5m");
        assert_eq!(post.age(created + Duration::hours(3)), "3h");
        assert_eq!(post.age(created + Duration::days(2)), "2d");
        assert_eq!(post.age(created + Duration::days(800)), "2y");
    }

    #[test]
    fn age_never_negative() {
        let post = test_post("a");
        assert_eq!(post.age(post.created_utc - Duration::minutes(1)), "0s");
    }

    #[test]
    fn post_id_display() {
        assert_eq!(PostId::from("1abcde").to_string(), "1abcde");
    }
}
