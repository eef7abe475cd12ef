//! The news list display component.
//!
//! The component owns the display list. `initialize` issues one fetch through
//! its `NewsSource`; the completion handler replaces the list wholesale on
//! success or records the failure. Observers read snapshots or subscribe to a
//! `watch` channel that fires on every change.

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::news::NewsItem;
use crate::service::NewsSource;

/// Where the component is in its load lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// No fetch has completed yet.
    #[default]
    Empty,
    /// The last completed fetch succeeded.
    Populated,
    /// The last completed fetch failed; the display list was left as is.
    Failed(FetchError),
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::Empty => "empty",
            LoadStatus::Populated => "populated",
            LoadStatus::Failed(_) => "failed",
        }
    }
}

/// Everything a renderer needs: the display list and how it got there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub news: Vec<NewsItem>,
    pub status: LoadStatus,
}

/// Handle on one in-flight fetch. Dropping it aborts the fetch.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct NewsListComponent {
    source: Arc<dyn NewsSource>,
    state: Arc<watch::Sender<ListState>>,
    subscriptions: Vec<Subscription>,
    initialized: bool,
}

impl NewsListComponent {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        let (tx, _rx) = watch::channel(ListState::default());
        Self {
            source,
            state: Arc::new(tx),
            subscriptions: Vec::new(),
            initialized: false,
        }
    }

    /// Issue the initial fetch. Returns immediately; the display list is
    /// replaced when the fetch completes. Calling it again is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!("news list already initialized; ignoring");
            return;
        }
        self.initialized = true;
        self.fetch();
    }

    /// Issue another fetch. Completions are applied in arrival order, so the
    /// last one to finish wins.
    pub fn refresh(&mut self) {
        self.fetch();
    }

    fn fetch(&mut self) {
        self.subscriptions.retain(|s| !s.is_finished());

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            match source.get_all().await {
                Ok(news) => {
                    info!(count = news.len(), "news list loaded");
                    state.send_modify(|s| {
                        s.news = news;
                        s.status = LoadStatus::Populated;
                    });
                }
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "news list fetch failed");
                    state.send_modify(|s| s.status = LoadStatus::Failed(e));
                }
            }
        });
        self.subscriptions.push(Subscription { handle });
    }

    /// Snapshot of the display list.
    pub fn news(&self) -> Vec<NewsItem> {
        self.state.borrow().news.clone()
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Receiver notified whenever the display list or status changes.
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }
}
