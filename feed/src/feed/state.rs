//! Feed state
//!
//! The whole state of one feed view, and the pure transitions applied to it.
//! Nothing here performs I/O: a load produces a [`LoadTicket`] describing the
//! request to send, and the response is fed back through [`FeedState::apply_page`]
//! or [`FeedState::apply_failure`].
//!
//! Each ticket carries a request id. Only the most recent ticket is pending;
//! a response for any other id is stale (its topic was reset or the view was
//! stopped) and is dropped without touching the state.

use crate::domain::entities::{Page, PageCursor, PageRequest, Post, SortOrder, Topic};
use crate::feed::dedup::dedup_by_id;

/// A load that has been started and must be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub request_id: u64,
    pub request: PageRequest,
}

/// Result of applying a fetch response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Page merged into the feed; `added` new posts survived deduplication
    Applied { added: usize },
    /// Fetch failure recorded in the error state
    Failed,
    /// Response belonged to a superseded request and was ignored
    Stale,
}

#[derive(Debug, Clone)]
pub struct FeedState {
    topic: Topic,
    sort: SortOrder,
    /// Display order; never holds two posts with the same id
    items: Vec<Post>,
    after: Option<PageCursor>,
    pending: Option<u64>,
    next_request_id: u64,
    exhausted: bool,
    error: Option<String>,
}

impl FeedState {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            sort: SortOrder::default(),
            items: Vec::new(),
            after: None,
            pending: None,
            next_request_id: 1,
            exhausted: false,
            error: None,
        }
    }

    /// Use `sort` instead of the default for the first page.
    /// Later resets still fall back to the default sort order.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn after(&self) -> Option<&PageCursor> {
        self.after.as_ref()
    }

    /// Whether a fetch is outstanding
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the last page has been received
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start loading the next page of the current topic.
    ///
    /// Returns `None` while another load is pending, and for non-reset
    /// loads once the feed is exhausted. A reset clears posts, cursor,
    /// sort order and error before the first page is requested.
    pub fn begin_load(&mut self, reset: bool, limit: u32) -> Option<LoadTicket> {
        if self.loading() {
            return None;
        }

        if reset {
            self.reset();
        } else if self.exhausted {
            return None;
        }

        Some(self.start(limit))
    }

    /// Replace the feed with the first page of `topic`.
    ///
    /// Unlike [`begin_load`](Self::begin_load) this never declines: a pending
    /// request is superseded and its response will be reported as stale.
    pub fn change_topic(&mut self, topic: Topic, limit: u32) -> LoadTicket {
        self.topic = topic;
        self.reset();
        self.start(limit)
    }

    /// Reload the current topic from the first page with a different sort order
    pub fn change_sort(&mut self, sort: SortOrder, limit: u32) -> LoadTicket {
        self.reset();
        self.sort = sort;
        self.start(limit)
    }

    /// Switch to `topic` without starting a load; the next load fetches
    /// its first page. Any pending request becomes stale.
    pub fn retarget(&mut self, topic: Topic) {
        self.topic = topic;
        self.pending = None;
        self.reset();
    }

    /// Like [`retarget`](Self::retarget), for a new sort order
    pub fn resort(&mut self, sort: SortOrder) {
        self.pending = None;
        self.reset();
        self.sort = sort;
    }

    /// Merge a fetched page into the feed
    pub fn apply_page(&mut self, request_id: u64, page: Page) -> ApplyOutcome {
        if self.pending != Some(request_id) {
            return ApplyOutcome::Stale;
        }
        self.pending = None;

        let before = self.items.len();
        let mut items = std::mem::take(&mut self.items);
        items.extend(page.items);
        self.items = dedup_by_id(items);
        let added = self.items.len() - before;

        // A cursor that does not advance would hand back the same page forever
        let stalled = page.after.is_some() && page.after == self.after;
        self.exhausted = page.after.is_none() || stalled;
        self.after = page.after;

        ApplyOutcome::Applied { added }
    }

    /// Record a failed fetch. Posts and cursor are kept, so the next load
    /// retries the same page.
    pub fn apply_failure(&mut self, request_id: u64, message: impl Into<String>) -> ApplyOutcome {
        if self.pending != Some(request_id) {
            return ApplyOutcome::Stale;
        }
        self.pending = None;
        self.error = Some(message.into());
        ApplyOutcome::Failed
    }

    /// Forget the pending request without applying anything
    pub fn abandon(&mut self) {
        self.pending = None;
    }

    fn reset(&mut self) {
        self.items.clear();
        self.after = None;
        self.sort = SortOrder::default();
        self.exhausted = false;
        self.error = None;
    }

    fn start(&mut self, limit: u32) -> LoadTicket {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.pending = Some(request_id);
        self.error = None;

        LoadTicket {
            request_id,
            request: PageRequest {
                topic: self.topic.clone(),
                sort: self.sort,
                after: self.after.clone(),
                limit,
            },
        }
    }
}
