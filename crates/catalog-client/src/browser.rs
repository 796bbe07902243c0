//! Debounced, cancellable list browser
//!
//! Mirrors what a search-as-you-type list view needs: keystrokes are committed
//! after a quiet period, every page change or committed search starts a new
//! fetch that cancels the previous one, and shutting down cancels everything.
//! Observers follow the state through a `watch` channel.

use crate::api::{FetchParams, ItemsSource};
use crate::error::ClientError;
use catalog_core::{Item, ItemsPage};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Quiet period after the last keystroke before a search is committed
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Items requested per page
pub const PAGE_SIZE: usize = 10;

/// Snapshot of the list view
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    /// Text as typed, possibly not yet committed
    pub input: String,
    /// Search text the current results belong to
    pub query: String,
    pub items: Vec<Item>,
    pub page: usize,
    pub total_pages: usize,
    pub loading: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            input: String::new(),
            query: String::new(),
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            loading: false,
        }
    }
}

impl ListState {
    pub fn can_go_prev(&self) -> bool {
        !self.loading && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.loading && self.page < self.total_pages
    }

    /// "Page 2 of 5"
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }

    /// Single-line status for the list body
    pub fn status_line(&self) -> Option<&'static str> {
        if self.loading {
            Some("Loading...")
        } else if self.items.is_empty() {
            Some("No items found.")
        } else {
            None
        }
    }
}

#[derive(Default)]
struct Tasks {
    debounce: Option<CancellationToken>,
    fetch: Option<CancellationToken>,
    /// Bumped per fetch; results carrying an older value are discarded
    generation: u64,
    closed: bool,
}

struct Shared<S> {
    source: S,
    state: watch::Sender<ListState>,
    tasks: Mutex<Tasks>,
}

/// Drives a paginated, searchable item list over an [`ItemsSource`]
///
/// Must be used from within a tokio runtime. Dropping the browser cancels any
/// pending debounce and outstanding fetch.
pub struct ItemsBrowser<S: ItemsSource> {
    shared: Arc<Shared<S>>,
}

impl<S: ItemsSource> ItemsBrowser<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            shared: Arc::new(Shared {
                source,
                state,
                tasks: Mutex::new(Tasks::default()),
            }),
        }
    }

    /// Follow state changes
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.shared.state.subscribe()
    }

    /// Current state
    pub fn state(&self) -> ListState {
        self.shared.state.borrow().clone()
    }

    /// Load the first page with no search
    pub fn start(&self) {
        self.shared.fetch(1, None);
    }

    /// Record typed text and commit it once input has been quiet for [`DEBOUNCE`].
    ///
    /// Committing resets to page 1. Each call restarts the quiet period.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();

        let token = {
            let mut tasks = self.shared.tasks.lock();
            if tasks.closed {
                return;
            }
            if let Some(previous) = tasks.debounce.take() {
                previous.cancel();
            }
            let token = CancellationToken::new();
            tasks.debounce = Some(token.clone());
            token
        };

        self.shared.state.send_modify(|s| s.input = text.clone());

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(DEBOUNCE) => shared.commit_query(text),
            }
        });
    }

    /// Advance one page. Returns false when already on the last page or loading.
    pub fn next_page(&self) -> bool {
        let state = self.state();
        if !state.can_go_next() {
            return false;
        }
        self.shared.fetch(state.page + 1, None);
        true
    }

    /// Go back one page. Returns false when already on page 1 or loading.
    pub fn prev_page(&self) -> bool {
        let state = self.state();
        if !state.can_go_prev() {
            return false;
        }
        self.shared.fetch(state.page - 1, None);
        true
    }

    /// Cancel the pending debounce and the outstanding fetch; later calls are ignored
    pub fn shutdown(&self) {
        let mut tasks = self.shared.tasks.lock();
        if tasks.closed {
            return;
        }
        tasks.closed = true;
        if let Some(token) = tasks.debounce.take() {
            token.cancel();
        }
        if let Some(token) = tasks.fetch.take() {
            token.cancel();
        }
        debug!("Items browser shut down");
    }
}

impl<S: ItemsSource> Drop for ItemsBrowser<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: ItemsSource> Shared<S> {
    fn commit_query(self: &Arc<Self>, text: String) {
        let current = self.state.borrow().clone();
        if current.query == text && current.page == 1 {
            return;
        }

        self.fetch(1, Some(text));
    }

    /// Start fetching `page`, cancelling any fetch in flight.
    ///
    /// `new_query` replaces the committed query in the same state update that
    /// raises `loading`, so observers never see the new query with stale results.
    fn fetch(self: &Arc<Self>, page: usize, new_query: Option<String>) {
        let (token, generation) = {
            let mut tasks = self.tasks.lock();
            if tasks.closed {
                return;
            }
            if let Some(previous) = tasks.fetch.take() {
                previous.cancel();
            }
            tasks.generation += 1;
            let token = CancellationToken::new();
            tasks.fetch = Some(token.clone());
            (token, tasks.generation)
        };

        let mut query = String::new();
        self.state.send_modify(|s| {
            if let Some(new_query) = new_query {
                s.query = new_query;
            }
            s.page = page;
            s.loading = true;
            query = s.query.clone();
        });

        let params = FetchParams {
            q: query,
            page,
            limit: PAGE_SIZE,
        };
        debug!(q = %params.q, page, generation, "Fetching items");

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(ClientError::Cancelled),
                result = shared.source.fetch_items(params, token.clone()) => result,
            };
            shared.finish(generation, result);
        });
    }

    fn finish(&self, generation: u64, result: Result<ItemsPage, ClientError>) {
        let mut tasks = self.tasks.lock();
        if tasks.generation != generation || tasks.closed {
            debug!(generation, "Discarding superseded fetch result");
            return;
        }
        tasks.fetch = None;

        match result {
            Ok(page) => self.state.send_modify(|s| {
                s.items = page.items;
                s.page = page.page;
                s.total_pages = page.total_pages;
                s.loading = false;
            }),
            Err(ClientError::Cancelled) => {}
            Err(e) => {
                error!(error = %e, "Failed to fetch items");
                self.state.send_modify(|s| s.loading = false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{query, QueryParams};

    /// In-memory source that records every request and the token it was given
    struct FakeSource {
        items: Vec<Item>,
        delay: Duration,
        calls: Mutex<Vec<(FetchParams, CancellationToken)>>,
        fail: bool,
    }

    impl FakeSource {
        fn new(count: usize) -> Self {
            let items = (0..count)
                .map(|i| Item {
                    id: i as u64 + 1,
                    name: if i % 2 == 0 {
                        format!("Apple {i}")
                    } else {
                        format!("Pear {i}")
                    },
                    price: 1.0,
                    category: "Fruit".to_string(),
                })
                .collect();
            Self {
                items,
                delay: Duration::from_millis(10),
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    impl ItemsSource for Arc<FakeSource> {
        async fn fetch_items(
            &self,
            params: FetchParams,
            cancel: CancellationToken,
        ) -> Result<ItemsPage, ClientError> {
            self.calls.lock().push((params.clone(), cancel));
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(ClientError::Http {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let q = (!params.q.is_empty()).then(|| params.q.clone());
            Ok(query(
                &self.items,
                &QueryParams::new(q, params.page as i64, params.limit as i64),
            ))
        }
    }

    fn queries(source: &FakeSource) -> Vec<String> {
        source.calls.lock().iter().map(|(p, _)| p.q.clone()).collect()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1000)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_loads_first_page() {
        let source = Arc::new(FakeSource::new(25));
        let browser = ItemsBrowser::new(Arc::clone(&source));

        browser.start();
        assert!(browser.state().loading);
        assert_eq!(browser.state().status_line(), Some("Loading..."));

        settle().await;
        let state = browser.state();
        assert!(!state.loading);
        assert_eq!(state.items.len(), PAGE_SIZE);
        assert_eq!(state.page_label(), "Page 1 of 3");
        assert_eq!(state.status_line(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_commits_only_last_input() {
        let source = Arc::new(FakeSource::new(25));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        settle().await;

        browser.set_query("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        browser.set_query("ap");
        tokio::time::sleep(Duration::from_millis(100)).await;
        browser.set_query("apple");
        assert_eq!(browser.state().input, "apple");

        // Still inside the quiet period of the last keystroke
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(queries(&source), vec![""]);

        settle().await;
        assert_eq!(queries(&source), vec!["", "apple"]);

        let state = browser.state();
        assert_eq!(state.query, "apple");
        assert!(state.items.iter().all(|i| i.name.starts_with("Apple")));
        assert_eq!(state.total_pages, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_committed_search_resets_to_page_one() {
        let source = Arc::new(FakeSource::new(25));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        settle().await;

        assert!(browser.next_page());
        settle().await;
        assert_eq!(browser.state().page, 2);

        browser.set_query("pear");
        settle().await;

        let state = browser.state();
        assert_eq!(state.page, 1);
        let last = source.calls.lock().last().unwrap().0.clone();
        assert_eq!(last, FetchParams { q: "pear".to_string(), page: 1, limit: PAGE_SIZE });
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_bounds() {
        let source = Arc::new(FakeSource::new(15));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        settle().await;

        assert!(!browser.prev_page());
        assert!(browser.next_page());
        // Loading: further navigation is blocked
        assert!(!browser.next_page());
        settle().await;

        let state = browser.state();
        assert_eq!(state.page, 2);
        assert_eq!(state.items.len(), 5);
        assert!(!browser.next_page());
        assert!(browser.prev_page());
        settle().await;
        assert_eq!(browser.state().page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_fetch_cancels_previous() {
        let source = Arc::new(FakeSource::new(25).with_delay(Duration::from_secs(5)));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        tokio::time::sleep(Duration::from_millis(10)).await;

        browser.set_query("pear");
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;

        {
            let calls = source.calls.lock();
            assert_eq!(calls.len(), 2);
            assert!(calls[0].1.is_cancelled());
            assert!(!calls[1].1.is_cancelled());
        }

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = browser.state();
        assert_eq!(state.query, "pear");
        assert!(state.items.iter().all(|i| i.name.starts_with("Pear")));
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_outstanding_work() {
        let source = Arc::new(FakeSource::new(5).with_delay(Duration::from_secs(5)));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        browser.set_query("apple");

        browser.shutdown();
        settle().await;

        let calls = source.calls.lock();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.is_cancelled());
        drop(calls);

        // Results never land after shutdown
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(browser.state().items.is_empty());

        browser.set_query("pear");
        settle().await;
        assert_eq!(source.calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_fetch() {
        let source = Arc::new(FakeSource::new(5).with_delay(Duration::from_secs(5)));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        tokio::time::sleep(Duration::from_millis(10)).await;

        drop(browser);
        assert!(source.calls.lock()[0].1.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_stops_loading() {
        let source = Arc::new(FakeSource::new(5).failing());
        let browser = ItemsBrowser::new(Arc::clone(&source));
        browser.start();
        settle().await;

        let state = browser.state();
        assert!(!state.loading);
        assert!(state.items.is_empty());
        assert_eq!(state.status_line(), Some("No items found."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let source = Arc::new(FakeSource::new(3));
        let browser = ItemsBrowser::new(Arc::clone(&source));
        let mut rx = browser.subscribe();

        browser.start();
        rx.wait_for(|s| !s.loading && s.items.len() == 3).await.unwrap();
    }
}
