//! Stream view
//!
//! The controller behind an infinitely scrolling feed. It owns the
//! [`FeedState`], dispatches page fetches to a [`ContentSource`] on the tokio
//! runtime and applies their results when the UI loop collects them.
//!
//! Lifecycle:
//! - `on_start`: attach scroll observation and request the first page
//! - `on_input_change`: reset the feed for a new topic
//! - `on_viewport_scroll`: request the next page near the end of the content
//! - `on_stop`: detach, abort the in-flight fetch and drop its result
//!
//! At most one fetch is outstanding. Triggers that arrive while loading are
//! dropped, not queued.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::domain::entities::{Page, SortOrder, Topic};
use crate::domain::ports::ContentSource;
use crate::error::FetchError;
use crate::feed::{ApplyOutcome, FeedState, LoadTicket, Viewport};
use crate::render::{feed_rows, FeedRow};

/// Paging behaviour of a stream view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub page_limit: u32,
    /// Remaining rows below the viewport that trigger the next page
    pub scroll_threshold: u32,
}

impl From<&Config> for StreamSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_limit: config.page_limit,
            scroll_threshold: config.scroll_threshold,
        }
    }
}

/// A finished fetch, tagged with the request it answers
struct FetchOutcome {
    request_id: u64,
    result: Result<Page, FetchError>,
}

pub struct StreamView<CS>
where
    CS: ContentSource + 'static,
{
    source: Arc<CS>,
    settings: StreamSettings,
    state: FeedState,
    attached: bool,
    in_flight: Option<JoinHandle<()>>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<CS> StreamView<CS>
where
    CS: ContentSource + 'static,
{
    pub fn new(source: Arc<CS>, topic: Topic, settings: StreamSettings) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            source,
            settings,
            state: FeedState::new(topic),
            attached: false,
            in_flight: None,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Request the first page with `sort` instead of the default
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.state = self.state.clone().with_sort(sort);
        self
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn settings(&self) -> StreamSettings {
        self.settings
    }

    /// Whether scroll observation is active
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Rows to render for the current state
    pub fn rows(&self) -> Vec<FeedRow> {
        feed_rows(&self.state, Utc::now())
    }

    /// Mount the view: start observing scrolls and fetch the first page.
    /// Returns whether a fetch was started; a second call is a no-op.
    pub fn on_start(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        tracing::info!("Stream view started for {}", self.state.topic());
        self.load(false)
    }

    /// Unmount the view. Scroll events are ignored afterwards and the
    /// in-flight fetch, if any, is aborted.
    pub fn on_stop(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.abort_in_flight();
        self.state.abandon();
        tracing::info!("Stream view stopped for {}", self.state.topic());
    }

    /// The routed topic changed: replace the feed with the new topic's first page.
    /// While stopped only the topic is recorded; `on_start` fetches it.
    pub fn on_input_change(&mut self, topic: Topic) {
        tracing::info!("Topic changed: {} -> {}", self.state.topic(), topic);
        self.abort_in_flight();
        if !self.attached {
            self.state.retarget(topic);
            return;
        }
        let ticket = self.state.change_topic(topic, self.settings.page_limit);
        self.dispatch(ticket);
    }

    /// Reload the current topic with a different sort order.
    /// While stopped only the sort is recorded.
    pub fn on_sort_change(&mut self, sort: SortOrder) {
        tracing::info!("Sort changed: {} -> {}", self.state.sort(), sort);
        self.abort_in_flight();
        if !self.attached {
            self.state.resort(sort);
            return;
        }
        let ticket = self.state.change_sort(sort, self.settings.page_limit);
        self.dispatch(ticket);
    }

    /// The list scrolled or resized. Loads the next page when fewer than
    /// `scroll_threshold` rows remain below the visible area.
    pub fn on_viewport_scroll(&mut self, viewport: Viewport) -> bool {
        if !self.attached || !viewport.near_end(self.settings.scroll_threshold) {
            return false;
        }
        self.load(false)
    }

    /// Start a load unless one is already in flight.
    /// Returns whether a fetch was started.
    pub fn load(&mut self, reset: bool) -> bool {
        match self.state.begin_load(reset, self.settings.page_limit) {
            Some(ticket) => {
                self.dispatch(ticket);
                true
            }
            None => {
                tracing::debug!(
                    loading = self.state.loading(),
                    exhausted = self.state.exhausted(),
                    "Load skipped"
                );
                false
            }
        }
    }

    /// Apply every fetch that has finished, without waiting.
    /// Returns whether the state changed.
    pub fn poll_outcomes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply(outcome) != ApplyOutcome::Stale;
        }
        changed
    }

    /// Wait for the next finished fetch and apply it.
    /// Returns `None` immediately when nothing is loading.
    pub async fn next_outcome(&mut self) -> Option<ApplyOutcome> {
        if !self.state.loading() {
            return None;
        }
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply(outcome))
    }

    fn dispatch(&mut self, ticket: LoadTicket) {
        tracing::debug!(
            request_id = ticket.request_id,
            topic = %ticket.request.topic,
            sort = %ticket.request.sort,
            after = ?ticket.request.after,
            "Fetching page"
        );

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch_page(&ticket.request).await;
            // The receiver lives as long as the view
            let _ = tx.send(FetchOutcome {
                request_id: ticket.request_id,
                result,
            });
        });
        self.in_flight = Some(handle);
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::debug!("Aborting in-flight fetch");
            }
            handle.abort();
        }
    }

    fn apply(&mut self, outcome: FetchOutcome) -> ApplyOutcome {
        let FetchOutcome { request_id, result } = outcome;
        let applied = match result {
            Ok(page) => {
                let received = page.items.len();
                let applied = self.state.apply_page(request_id, page);
                if let ApplyOutcome::Applied { added } = applied {
                    tracing::debug!(
                        request_id,
                        received,
                        added,
                        total = self.state.items().len(),
                        "Page applied"
                    );
                }
                applied
            }
            Err(e) => {
                let applied = self.state.apply_failure(request_id, e.user_message());
                if applied == ApplyOutcome::Failed {
                    tracing::warn!("Failed to fetch {}: {}", self.state.topic(), e);
                }
                applied
            }
        };

        if applied == ApplyOutcome::Stale {
            tracing::warn!(request_id, "Discarded stale fetch result");
        } else {
            self.in_flight = None;
        }
        applied
    }
}

impl<CS> Drop for StreamView<CS>
where
    CS: ContentSource + 'static,
{
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PageCursor;
    use crate::test_utils::{test_page, MockContentSource};
    use std::collections::HashSet;

    const SETTINGS: StreamSettings = StreamSettings {
        page_limit: 25,
        scroll_threshold: 6,
    };

    fn topic(name: &str) -> Topic {
        Topic::parse(name).unwrap()
    }

    fn create_view(
        source: MockContentSource,
        name: &str,
    ) -> (StreamView<MockContentSource>, Arc<MockContentSource>) {
        let source = Arc::new(source);
        let view = StreamView::new(source.clone(), topic(name), SETTINGS);
        (view, source)
    }

    fn near_end() -> Viewport {
        Viewport {
            scroll_height: 100,
            scroll_top: 70,
            offset_height: 28,
        }
    }

    fn far_from_end() -> Viewport {
        Viewport {
            scroll_height: 100,
            scroll_top: 0,
            offset_height: 28,
        }
    }

    #[tokio::test]
    async fn initial_mount_fetches_first_page() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a", "b"], Some("t3_b")));
        let (mut view, source) = create_view(source, "all");

        assert!(view.on_start());
        assert!(view.state().loading());

        let outcome = view.next_outcome().await;

        assert_eq!(outcome, Some(ApplyOutcome::Applied { added: 2 }));
        assert_eq!(source.request_count(), 1);
        let request = &source.requests()[0];
        assert_eq!(request.topic, topic("all"));
        assert_eq!(request.after, None);
        assert_eq!(request.sort, SortOrder::Hot);
        assert_eq!(view.state().items().len(), 2);
        assert!(!view.state().loading());
    }

    #[tokio::test]
    async fn on_start_twice_fetches_once() {
        let (mut view, source) = create_view(MockContentSource::new(), "all");

        assert!(view.on_start());
        assert!(!view.on_start());
        view.next_outcome().await;

        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn load_while_loading_issues_no_fetch() {
        let (mut view, source) = create_view(MockContentSource::new(), "all");
        view.on_start();

        assert!(!view.load(false));
        assert!(!view.on_viewport_scroll(near_end()));
        view.next_outcome().await;

        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn scroll_near_end_fetches_next_page_with_cursor() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a", "b"], Some("t3_b")))
            .with_page("all", Some("t3_b"), test_page(&["c"], Some("t3_c")));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;

        assert!(view.on_viewport_scroll(near_end()));
        view.next_outcome().await;

        assert_eq!(source.request_count(), 2);
        assert_eq!(source.requests()[1].after, Some(PageCursor::from("t3_b")));
        assert_eq!(view.state().items().len(), 3);
    }

    #[tokio::test]
    async fn scroll_far_from_end_does_nothing() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], Some("t3_a")));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;

        assert!(!view.on_viewport_scroll(far_from_end()));
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn overlapping_pages_render_unique_ids() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a", "b", "c"], Some("t3_c")))
            .with_page("all", Some("t3_c"), test_page(&["b", "c", "d", "e"], Some("t3_e")));
        let (mut view, _source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;
        view.on_viewport_scroll(near_end());
        view.next_outcome().await;

        let ids: Vec<String> = view
            .rows()
            .into_iter()
            .filter_map(|row| match row {
                FeedRow::Entry(entry) => Some(entry.id),
                _ => None,
            })
            .collect();
        let unique: HashSet<&String> = ids.iter().collect();

        assert_eq!(ids.len(), 5);
        assert_eq!(unique.len(), ids.len());
    }

    #[tokio::test]
    async fn topic_change_resets_then_loads_new_first_page() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a", "b"], Some("t3_b")))
            .with_page("rust", None, test_page(&["r1"], Some("t3_r1")));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;

        view.on_input_change(topic("rust"));

        assert!(view.state().items().is_empty());
        assert!(view.state().loading());
        assert_eq!(view.rows(), vec![FeedRow::Loading]);

        view.next_outcome().await;

        assert!(!view.state().loading());
        assert_eq!(view.state().topic(), &topic("rust"));
        let ids: Vec<&str> = view.state().items().iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);
        assert_eq!(source.requests()[1].after, None);
    }

    #[tokio::test]
    async fn finished_result_from_old_topic_is_stale() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], Some("t3_a")))
            .with_page("rust", None, test_page(&["r1", "r2"], None));
        let (mut view, _source) = create_view(source, "all");
        view.on_start();
        // The first fetch completes and waits in the channel
        tokio::task::yield_now().await;

        view.on_input_change(topic("rust"));

        let outcomes = vec![view.next_outcome().await, view.next_outcome().await];
        assert_eq!(
            outcomes,
            vec![
                Some(ApplyOutcome::Stale),
                Some(ApplyOutcome::Applied { added: 2 })
            ]
        );
        let ids: Vec<&str> = view.state().items().iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn topic_change_aborts_held_fetch() {
        let source = MockContentSource::new()
            .holding("all")
            .with_page("all", None, test_page(&["a"], Some("t3_a")))
            .with_page("rust", None, test_page(&["r1", "r2"], None));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        // Let the held fetch reach the mock
        tokio::task::yield_now().await;

        view.on_input_change(topic("rust"));
        source.release();

        while view.state().loading() {
            view.next_outcome().await;
        }

        let ids: Vec<&str> = view.state().items().iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert_eq!(view.state().topic(), &topic("rust"));
    }

    #[tokio::test]
    async fn sort_change_reloads_with_new_sort() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], Some("t3_a")));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;

        view.on_sort_change(SortOrder::New);
        view.next_outcome().await;

        let request = &source.requests()[1];
        assert_eq!(request.sort, SortOrder::New);
        assert_eq!(request.after, None);
        assert_eq!(view.state().sort(), SortOrder::New);
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_error_and_scroll_retries_same_page() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], Some("t3_a")))
            .with_page("all", Some("t3_a"), test_page(&["b"], Some("t3_b")));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;

        source.fail_next(1);
        view.on_viewport_scroll(near_end());
        assert_eq!(view.next_outcome().await, Some(ApplyOutcome::Failed));

        assert!(!view.state().loading());
        assert!(view.state().error().is_some());
        assert!(matches!(view.rows().last(), Some(FeedRow::Error(_))));

        assert!(view.on_viewport_scroll(near_end()));
        view.next_outcome().await;

        let requests = source.requests();
        assert_eq!(requests[1].after, requests[2].after);
        assert!(view.state().error().is_none());
        assert_eq!(view.state().items().len(), 2);
    }

    #[tokio::test]
    async fn scroll_after_stop_is_ignored() {
        let (mut view, source) = create_view(MockContentSource::new().holding("all"), "all");
        view.on_start();
        tokio::task::yield_now().await;

        view.on_stop();

        assert!(!view.is_attached());
        assert!(!view.state().loading());
        assert!(!view.on_viewport_scroll(near_end()));
        assert_eq!(source.request_count(), 1);
        assert_eq!(view.next_outcome().await, None);
    }

    #[tokio::test]
    async fn topic_change_after_stop_waits_for_start() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], Some("t3_a")))
            .with_page("rust", None, test_page(&["r1"], Some("t3_r1")));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;
        view.on_stop();

        view.on_input_change(topic("rust"));
        view.on_sort_change(SortOrder::Top);

        assert!(!view.state().loading());
        assert!(view.state().items().is_empty());
        assert_eq!(view.next_outcome().await, None);
        assert_eq!(source.request_count(), 1);

        assert!(view.on_start());
        view.next_outcome().await;

        let request = &source.requests()[1];
        assert_eq!(request.topic, topic("rust"));
        assert_eq!(request.sort, SortOrder::Top);
        assert_eq!(request.after, None);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn exhausted_feed_stops_paging() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], None));
        let (mut view, source) = create_view(source, "all");
        view.on_start();
        view.next_outcome().await;

        assert!(!view.on_viewport_scroll(near_end()));
        assert_eq!(source.request_count(), 1);
        assert_eq!(view.rows().last(), Some(&FeedRow::End));
    }

    #[tokio::test]
    async fn poll_outcomes_applies_finished_fetches() {
        let source = MockContentSource::new()
            .with_page("all", None, test_page(&["a"], Some("t3_a")));
        let (mut view, _source) = create_view(source, "all");
        view.on_start();

        while view.state().loading() {
            tokio::task::yield_now().await;
            view.poll_outcomes();
        }

        assert_eq!(view.state().items().len(), 1);
        assert!(!view.poll_outcomes());
    }

    #[test]
    fn settings_from_config() {
        let config = Config {
            page_limit: 50,
            scroll_threshold: 9,
            ..Config::default()
        };
        let settings = StreamSettings::from(&config);
        assert_eq!(settings.page_limit, 50);
        assert_eq!(settings.scroll_threshold, 9);
    }
}
