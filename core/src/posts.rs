//! Post list screen.

use futures::FutureExt;

use crate::client::JphClient;
use crate::error::ApiError;
use crate::feedback::Feedback;
use crate::screen::Screen;
use crate::types::Post;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsState {
    Idle,
    Loading,
    Loaded(Vec<Post>),
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsEvent {
    Appeared,
    Loaded(Vec<Post>),
    LoadFailed(ApiError),
}

impl PostsState {
    pub fn reduce(self, event: PostsEvent) -> Self {
        match (self, event) {
            (Self::Idle, PostsEvent::Appeared) => Self::Loading,
            (Self::Loading, PostsEvent::Loaded(posts)) => Self::Loaded(posts),
            (Self::Loading, PostsEvent::LoadFailed(error)) => Self::Failed(error),
            (state, _) => state,
        }
    }

    /// Loaded or failed: nothing more happens without a new screen.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }
}

pub type PostsScreen = Screen<PostsState, PostsEvent>;

impl Screen<PostsState, PostsEvent> {
    /// Open the post list in its idle state. The fetch starts on `Appeared`.
    pub fn new(client: JphClient) -> Self {
        Self::spawn(PostsState::Idle, PostsState::reduce, fetch_posts(client))
    }
}

/// Fetches the post list whenever the state is `Loading`.
pub fn fetch_posts(client: JphClient) -> Feedback<PostsState, PostsEvent> {
    Feedback::effects(move |state: &PostsState| {
        if !matches!(state, PostsState::Loading) {
            return None;
        }
        let client = client.clone();
        Some(
            async move {
                match client.list_posts().await {
                    Ok(posts) => PostsEvent::Loaded(posts),
                    Err(e) => PostsEvent::LoadFailed(e),
                }
            }
            .boxed(),
        )
    })
}
