//! Mock implementations of port traits
//!
//! In-memory implementations that can be configured for testing.
//! They record every call so tests can verify how often, and with which
//! cursor, the feed asked for a page.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tokio::sync::Notify;

use crate::domain::entities::{Page, PageRequest};
use crate::domain::ports::ContentSource;
use crate::error::FetchError;

/// (topic, after cursor)
type PageKey = (String, Option<String>);

// ============================================================================
// Mock Content Source
// ============================================================================

#[derive(Default)]
pub struct MockContentSource {
    pages: Arc<RwLock<HashMap<PageKey, Page>>>,
    requests: Arc<RwLock<Vec<PageRequest>>>,
    /// Number of upcoming fetches that fail
    failures: Arc<RwLock<u32>>,
    /// Topics whose fetches block until `release` is called
    held_topics: Arc<RwLock<HashSet<String>>>,
    release: Arc<Notify>,
}

impl MockContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for `topic` after cursor `after`.
    /// Unconfigured requests get an empty last page.
    pub fn with_page(self, topic: &str, after: Option<&str>, page: Page) -> Self {
        {
            let mut pages = self.pages.write().unwrap();
            pages.insert((topic.to_string(), after.map(str::to_string)), page);
        }
        self
    }

    /// Make every fetch for `topic` wait until [`release`](Self::release)
    pub fn holding(self, topic: &str) -> Self {
        self.held_topics.write().unwrap().insert(topic.to_string());
        self
    }

    /// Fail the next `count` fetches
    pub fn fail_next(&self, count: u32) {
        *self.failures.write().unwrap() = count;
    }

    /// Let held fetches complete
    pub fn release(&self) {
        self.held_topics.write().unwrap().clear();
        self.release.notify_waiters();
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.read().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        self.requests.write().unwrap().push(request.clone());

        let topic = request.topic.as_str().to_string();
        let held = self.held_topics.read().unwrap().contains(&topic);
        if held {
            self.release.notified().await;
        }

        {
            let mut failures = self.failures.write().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(FetchError::RateLimited);
            }
        }

        let key = (topic, request.after.as_ref().map(|a| a.0.clone()));
        let pages = self.pages.read().unwrap();
        Ok(pages.get(&key).cloned().unwrap_or_default())
    }
}
