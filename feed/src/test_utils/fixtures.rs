//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{TimeZone, Utc};

use crate::domain::entities::{Page, PageCursor, Post, PostId};

/// Create a test post with the given id
pub fn test_post(id: &str) -> Post {
    test_post_titled(id, &format!("Post {}", id))
}

/// Create a test post with a specific title
pub fn test_post_titled(id: &str, title: &str) -> Post {
    Post {
        id: PostId(id.to_string()),
        title: title.to_string(),
        author: "ferris".to_string(),
        subreddit: "rust".to_string(),
        score: 42,
        num_comments: 7,
        permalink: format!("/r/rust/comments/{}/", id),
        url: format!("https://example.com/{}", id),
        created_utc: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        over_18: false,
        is_self: false,
    }
}

/// Create a page of test posts
pub fn test_page(ids: &[&str], after: Option<&str>) -> Page {
    Page {
        items: ids.iter().map(|id| test_post(id)).collect(),
        after: after.map(PageCursor::from),
    }
}
