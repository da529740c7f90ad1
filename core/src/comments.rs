//! Comment list screen for one post.

use futures::FutureExt;

use crate::client::JphClient;
use crate::error::ApiError;
use crate::feedback::Feedback;
use crate::screen::Screen;
use crate::types::Comment;

/// `Idle` and `Loading` carry the id of the post whose comments are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentsState {
    Idle(i64),
    Loading(i64),
    Loaded(Vec<Comment>),
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentsEvent {
    Appeared,
    Loaded(Vec<Comment>),
    LoadFailed(ApiError),
}

impl CommentsState {
    pub fn reduce(self, event: CommentsEvent) -> Self {
        match (self, event) {
            (Self::Idle(post_id), CommentsEvent::Appeared) => Self::Loading(post_id),
            (Self::Loading(_), CommentsEvent::Loaded(comments)) => Self::Loaded(comments),
            (Self::Loading(_), CommentsEvent::LoadFailed(error)) => Self::Failed(error),
            (state, _) => state,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }
}

pub type CommentsScreen = Screen<CommentsState, CommentsEvent>;

impl Screen<CommentsState, CommentsEvent> {
    /// Open the comment list of `post_id` in its idle state.
    pub fn new(client: JphClient, post_id: i64) -> Self {
        Self::spawn(CommentsState::Idle(post_id), CommentsState::reduce, fetch_comments(client))
    }
}

/// Fetches the comments of the carried post whenever the state is `Loading`.
pub fn fetch_comments(client: JphClient) -> Feedback<CommentsState, CommentsEvent> {
    Feedback::effects(move |state: &CommentsState| {
        let CommentsState::Loading(post_id) = *state else {
            return None;
        };
        let client = client.clone();
        Some(
            async move {
                match client.list_comments(post_id).await {
                    Ok(comments) => CommentsEvent::Loaded(comments),
                    Err(e) => CommentsEvent::LoadFailed(e),
                }
            }
            .boxed(),
        )
    })
}
