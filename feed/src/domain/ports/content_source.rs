//! Content source port
//!
//! The collaborator a feed pulls pages from.

use async_trait::async_trait;

use crate::domain::entities::{Page, PageRequest};
use crate::error::FetchError;

/// Source of paginated posts
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page of `request.topic`, continuing after `request.after`
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError>;
}
