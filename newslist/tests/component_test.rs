use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use newslist::component::{ListState, LoadStatus, NewsListComponent};
use newslist::error::FetchError;
use newslist::news::NewsItem;
use newslist::service::NewsSource;
use tokio::sync::{oneshot, watch};

type Reply = Result<Vec<NewsItem>, FetchError>;

/// News source whose calls resolve only when the test sends a reply.
/// A call with no scripted reply, or whose sender was dropped, never resolves.
struct ScriptedSource {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(count: usize) -> (Arc<Self>, Vec<oneshot::Sender<Reply>>) {
        let mut senders = Vec::new();
        let mut receivers = VecDeque::new();
        for _ in 0..count {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        let source = Arc::new(Self {
            replies: Mutex::new(receivers),
            calls: AtomicUsize::new(0),
        });
        (source, senders)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NewsSource for ScriptedSource {
    async fn get_all(&self) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(rx) => match rx.await {
                Ok(reply) => reply,
                Err(_) => std::future::pending().await,
            },
            None => std::future::pending().await,
        }
    }
}

fn component_with(source: &Arc<ScriptedSource>) -> NewsListComponent {
    let source: Arc<dyn NewsSource> = source.clone();
    NewsListComponent::new(source)
}

async fn next_state(rx: &mut watch::Receiver<ListState>) -> ListState {
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("state change within timeout")
        .expect("component alive");
    rx.borrow_and_update().clone()
}

fn two_items() -> Vec<NewsItem> {
    vec![NewsItem::new(1, "A"), NewsItem::new(2, "B")]
}

#[tokio::test]
async fn test_list_is_empty_before_fetch_completes() {
    let (source, mut senders) = ScriptedSource::new(1);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();

    assert!(component.news().is_empty());
    component.initialize();
    tokio::task::yield_now().await;

    assert_eq!(source.calls(), 1);
    assert!(component.news().is_empty());
    assert_eq!(component.state().status, LoadStatus::Empty);

    senders.remove(0).send(Ok(two_items())).unwrap();
    let state = next_state(&mut rx).await;
    assert_eq!(state.news, two_items());
}

#[tokio::test]
async fn test_delivered_list_is_shown_exactly() {
    let (source, mut senders) = ScriptedSource::new(1);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();
    component.initialize();

    senders.remove(0).send(Ok(two_items())).unwrap();
    let state = next_state(&mut rx).await;

    assert_eq!(state.status, LoadStatus::Populated);
    assert_eq!(state.news, two_items());
    assert_eq!(component.news(), two_items());
}

#[tokio::test]
async fn test_empty_reply_is_populated_not_pending() {
    let (source, mut senders) = ScriptedSource::new(1);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();
    component.initialize();

    senders.remove(0).send(Ok(Vec::new())).unwrap();
    let state = next_state(&mut rx).await;

    // Same list as before the fetch; only the status tells them apart.
    assert!(state.news.is_empty());
    assert_eq!(state.status, LoadStatus::Populated);
}

#[tokio::test]
async fn test_failed_fetch_leaves_list_empty_and_records_error() {
    let (source, mut senders) = ScriptedSource::new(1);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();
    component.initialize();

    let err = FetchError::Transport("connection refused".to_string());
    senders.remove(0).send(Err(err.clone())).unwrap();
    let state = next_state(&mut rx).await;

    assert!(state.news.is_empty());
    assert_eq!(state.status, LoadStatus::Failed(err));
}

#[tokio::test(start_paused = true)]
async fn test_never_resolving_fetch_keeps_list_empty() {
    let (source, _senders) = ScriptedSource::new(1);
    let mut component = component_with(&source);
    component.initialize();

    tokio::time::sleep(Duration::from_secs(24 * 3600)).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(component.state(), ListState::default());
}

#[tokio::test]
async fn test_second_initialize_is_ignored() {
    let (source, mut senders) = ScriptedSource::new(2);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();

    component.initialize();
    component.initialize();

    senders.remove(0).send(Ok(two_items())).unwrap();
    next_state(&mut rx).await;
    tokio::task::yield_now().await;

    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_last_completion_wins() {
    let (source, mut senders) = ScriptedSource::new(2);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();

    component.initialize();
    tokio::task::yield_now().await;
    component.refresh();
    tokio::task::yield_now().await;
    assert_eq!(source.calls(), 2);

    let first = senders.remove(0);
    let second = senders.remove(0);

    // The refresh completes first, the initial fetch completes last.
    second.send(Ok(vec![NewsItem::new(9, "newer")])).unwrap();
    let state = next_state(&mut rx).await;
    assert_eq!(state.news, vec![NewsItem::new(9, "newer")]);

    first.send(Ok(two_items())).unwrap();
    let state = next_state(&mut rx).await;
    assert_eq!(state.news, two_items());
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_list() {
    let (source, mut senders) = ScriptedSource::new(2);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();

    component.initialize();
    senders.remove(0).send(Ok(two_items())).unwrap();
    next_state(&mut rx).await;

    component.refresh();
    let err = FetchError::Status {
        status: 500,
        body: String::new(),
    };
    senders.remove(0).send(Err(err.clone())).unwrap();
    let state = next_state(&mut rx).await;

    assert_eq!(state.news, two_items());
    assert_eq!(state.status, LoadStatus::Failed(err));
}

#[tokio::test]
async fn test_dropping_component_cancels_pending_fetch() {
    let (source, mut senders) = ScriptedSource::new(1);
    let mut component = component_with(&source);
    let mut rx = component.subscribe();

    component.initialize();
    tokio::task::yield_now().await;
    assert_eq!(source.calls(), 1);

    drop(component);

    // The aborted task drops its end of the reply channel...
    let mut sender = senders.remove(0);
    tokio::time::timeout(Duration::from_secs(5), sender.closed())
        .await
        .expect("fetch aborted after component drop");

    // ...and with it the last handle on the state, so observers see the end.
    let changed = tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("receiver notified");
    assert!(changed.is_err());
    assert!(rx.borrow().news.is_empty());
}
