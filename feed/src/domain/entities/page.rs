//! Pagination types
//!
//! One request for, and one response of, the content API.

use serde::{Deserialize, Serialize};

use super::post::Post;
use super::topic::{SortOrder, Topic};

/// Opaque pagination token returned by the API (`after`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor(pub String);

impl From<&str> for PageCursor {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request for a single page of a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub topic: Topic,
    pub sort: SortOrder,
    /// Cursor of the last page received, `None` for the first page
    pub after: Option<PageCursor>,
    pub limit: u32,
}

/// A page of posts and the cursor for the next one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Post>,
    /// `None` when there are no further pages
    pub after: Option<PageCursor>,
}
