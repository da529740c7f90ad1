//! Screen scenarios driven through mock transports.
//!
//! # Design
//! `Recording` answers from a queue of canned replies and remembers every
//! request. `Gated` parks each request until the test hands it a reply, which
//! lets a test hold a fetch open while the screen moves on.

use std::collections::VecDeque;
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::time::Duration;

use jph_core::{
    ApiError, Comment, CommentsEvent, CommentsScreen, CommentsState, HttpRequest, HttpResponse, JphClient,
    Post, PostsEvent, PostsScreen, PostsState, StateStream, Transport, TransportError,
};
use tokio::sync::mpsc;

type Reply = Result<HttpResponse, TransportError>;

struct Recording {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Recording {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for Recording {
    fn execute(&self, request: &HttpRequest) -> Reply {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no canned reply left")))
    }
}

type Parked = (HttpRequest, std_mpsc::Sender<Reply>);

struct Gated {
    parked: mpsc::UnboundedSender<Parked>,
}

impl Gated {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Parked>) {
        let (parked, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { parked }), rx)
    }
}

impl Transport for Gated {
    fn execute(&self, request: &HttpRequest) -> Reply {
        let (reply_tx, reply_rx) = std_mpsc::channel();
        self.parked
            .send((request.clone(), reply_tx))
            .map_err(|_| TransportError::new("test is gone"))?;
        reply_rx
            .recv()
            .unwrap_or_else(|_| Err(TransportError::new("released without a reply")))
    }
}

fn client(transport: Arc<dyn Transport>) -> JphClient {
    JphClient::new("https://jsonplaceholder.typicode.com", transport).unwrap()
}

fn ok(body: String) -> Reply {
    Ok(HttpResponse {
        status: 200,
        body: body.into_bytes(),
    })
}

fn post(id: i64) -> Post {
    Post {
        user_id: 1,
        id,
        title: format!("title {id}"),
        body: format!("body {id}"),
    }
}

fn comment(post_id: i64, id: i64) -> Comment {
    Comment {
        post_id,
        id,
        name: format!("name {id}"),
        email: format!("{id}@example.com"),
        body: format!("body {id}"),
    }
}

fn json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}

/// Fails if another state shows up within a short window.
async fn assert_quiet<S: std::fmt::Debug>(states: &mut StateStream<S>) {
    let extra = tokio::time::timeout(Duration::from_millis(50), states.recv()).await;
    assert!(extra.is_err(), "unexpected state: {extra:?}");
}

#[tokio::test]
async fn posts_screen_loads_two_posts() {
    let transport = Recording::new(vec![ok(json(&vec![post(1), post(2)]))]);
    let screen = PostsScreen::new(client(transport.clone()));
    let mut states = screen.states();

    screen.send(PostsEvent::Appeared);

    assert_eq!(states.recv().await, Some(PostsState::Idle));
    assert_eq!(states.recv().await, Some(PostsState::Loading));
    assert_eq!(states.recv().await, Some(PostsState::Loaded(vec![post(1), post(2)])));
    assert_quiet(&mut states).await;

    assert_eq!(screen.state(), PostsState::Loaded(vec![post(1), post(2)]));
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.as_str(), "https://jsonplaceholder.typicode.com/posts");
}

#[tokio::test]
async fn posts_screen_reports_transport_failure() {
    let transport = Recording::new(vec![Err(TransportError::new("network is unreachable"))]);
    let screen = PostsScreen::new(client(transport));
    let mut states = screen.states();

    screen.send(PostsEvent::Appeared);

    assert_eq!(states.recv().await, Some(PostsState::Idle));
    assert_eq!(states.recv().await, Some(PostsState::Loading));
    let failed = states.recv().await.unwrap();
    assert_eq!(
        failed,
        PostsState::Failed(ApiError::Transport(TransportError::new("network is unreachable")))
    );
    assert_quiet(&mut states).await;
}

#[tokio::test]
async fn comments_screen_requests_comments_for_its_post() {
    let transport = Recording::new(vec![ok(json(&vec![comment(7, 31), comment(7, 32)]))]);
    let screen = CommentsScreen::new(client(transport.clone()), 7);
    let mut states = screen.states();

    screen.send(CommentsEvent::Appeared);

    assert_eq!(states.recv().await, Some(CommentsState::Idle(7)));
    assert_eq!(states.recv().await, Some(CommentsState::Loading(7)));
    assert_eq!(
        states.recv().await,
        Some(CommentsState::Loaded(vec![comment(7, 31), comment(7, 32)]))
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/comments");
    assert_eq!(requests[0].query_pairs(), vec![("postId".to_string(), "7".to_string())]);
}

#[tokio::test]
async fn missing_field_fails_with_decode_error() {
    let transport = Recording::new(vec![ok(r#"[{"userId":1,"id":1,"body":"no title"}]"#.to_string())]);
    let screen = PostsScreen::new(client(transport));
    let mut states = screen.states();

    screen.send(PostsEvent::Appeared);

    let settled = states.wait_for(PostsState::is_settled).await.unwrap();
    assert!(matches!(settled, PostsState::Failed(ApiError::Decode(_))), "{settled:?}");
}

#[tokio::test]
async fn server_error_fails_with_status() {
    let transport = Recording::new(vec![Ok(HttpResponse {
        status: 503,
        body: b"unavailable".to_vec(),
    })]);
    let screen = CommentsScreen::new(client(transport), 1);
    let mut states = screen.states();

    screen.send(CommentsEvent::Appeared);

    let settled = states.wait_for(CommentsState::is_settled).await.unwrap();
    assert_eq!(
        settled,
        CommentsState::Failed(ApiError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    );
    assert_eq!(
        settled_message(&settled),
        Some("HTTP 503: unavailable".to_string())
    );
}

fn settled_message(state: &CommentsState) -> Option<String> {
    match state {
        CommentsState::Failed(e) => Some(e.to_string()),
        _ => None,
    }
}

#[tokio::test]
async fn appeared_after_settling_changes_nothing() {
    let transport = Recording::new(vec![ok(json(&vec![post(1)]))]);
    let screen = PostsScreen::new(client(transport.clone()));
    let mut states = screen.states();

    screen.send(PostsEvent::Appeared);
    states.wait_for(PostsState::is_settled).await.unwrap();

    screen.send(PostsEvent::Appeared);
    assert_eq!(states.recv().await, Some(PostsState::Loaded(vec![post(1)])));
    assert_quiet(&mut states).await;
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn second_appeared_while_loading_keeps_loading_and_latest_fetch_wins() {
    let (transport, mut parked) = Gated::new();
    let screen = PostsScreen::new(client(transport));
    let mut states = screen.states();

    screen.send(PostsEvent::Appeared);
    assert_eq!(states.recv().await, Some(PostsState::Idle));
    assert_eq!(states.recv().await, Some(PostsState::Loading));
    let (first, reply_first) = parked.recv().await.unwrap();

    // Unhandled while loading: the state is republished unchanged, which
    // restarts the fetch.
    screen.send(PostsEvent::Appeared);
    assert_eq!(states.recv().await, Some(PostsState::Loading));
    let (second, reply_second) = parked.recv().await.unwrap();
    assert_eq!(first, second);

    // The superseded fetch answers first; its result must be dropped.
    let _ = reply_first.send(ok(json(&vec![post(1)])));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(screen.state(), PostsState::Loading);

    reply_second.send(ok(json(&vec![post(2)]))).unwrap();
    assert_eq!(states.recv().await, Some(PostsState::Loaded(vec![post(2)])));
    assert_quiet(&mut states).await;
}

#[tokio::test]
async fn fetch_answered_while_being_superseded_is_dropped() {
    let (transport, mut parked) = Gated::new();
    let screen = PostsScreen::new(client(transport));
    let mut states = screen.states();

    screen.send(PostsEvent::Appeared);
    assert_eq!(states.recv().await, Some(PostsState::Idle));
    assert_eq!(states.recv().await, Some(PostsState::Loading));
    let (_, reply_first) = parked.recv().await.unwrap();

    // Answer the first fetch as soon as `Loading` is republished, before the
    // effect for the new state has started.
    screen.send(PostsEvent::Appeared);
    assert_eq!(states.recv().await, Some(PostsState::Loading));
    reply_first.send(ok(json(&vec![post(1)]))).unwrap();

    let (_, reply_second) = parked.recv().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(screen.state(), PostsState::Loading);

    reply_second.send(ok(json(&vec![post(2)]))).unwrap();
    assert_eq!(states.recv().await, Some(PostsState::Loaded(vec![post(2)])));
    assert_quiet(&mut states).await;
}

#[tokio::test]
async fn each_comment_screen_is_independent() {
    let transport = Recording::new(vec![
        ok(json(&vec![comment(1, 1)])),
        ok(json(&vec![comment(2, 3)])),
    ]);
    let first = CommentsScreen::new(client(transport.clone()), 1);
    let mut first_states = first.states();
    first.send(CommentsEvent::Appeared);
    let first_settled = first_states.wait_for(CommentsState::is_settled).await;

    let second = CommentsScreen::new(client(transport.clone()), 2);
    assert_eq!(second.state(), CommentsState::Idle(2));
    let mut second_states = second.states();
    second.send(CommentsEvent::Appeared);
    let second_settled = second_states.wait_for(CommentsState::is_settled).await;

    assert_eq!(first_settled, Some(CommentsState::Loaded(vec![comment(1, 1)])));
    assert_eq!(second_settled, Some(CommentsState::Loaded(vec![comment(2, 3)])));
    assert_eq!(first.state(), CommentsState::Loaded(vec![comment(1, 1)]));
    assert_eq!(transport.requests()[1].url.query(), Some("postId=2"));
}
