use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: i64,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFilter {
    pub post_id: Option<i64>,
}

#[derive(Debug)]
pub struct Fixtures {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

pub type Db = Arc<Fixtures>;

/// Three posts, two comments each.
pub fn fixtures() -> Fixtures {
    let posts: Vec<Post> = (1..=3)
        .map(|id| Post {
            user_id: if id < 3 { 1 } else { 2 },
            id,
            title: format!("post {id}"),
            body: format!("body of post {id}"),
        })
        .collect();

    let comments = posts
        .iter()
        .flat_map(|post| {
            (0..2).map(move |n| {
                let id = (post.id - 1) * 2 + n + 1;
                Comment {
                    post_id: post.id,
                    id,
                    name: format!("comment {id}"),
                    email: format!("user{id}@example.com"),
                    body: format!("comment {id} on post {}", post.id),
                }
            })
        })
        .collect();

    Fixtures { posts, comments }
}

pub fn app() -> Router {
    let db: Db = Arc::new(fixtures());
    Router::new()
        .route("/posts", get(list_posts))
        .route("/comments", get(list_comments))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    Json(db.posts.clone())
}

async fn list_comments(
    State(db): State<Db>,
    Query(filter): Query<CommentFilter>,
) -> Json<Vec<Comment>> {
    let comments = db
        .comments
        .iter()
        .filter(|c| filter.post_id.map_or(true, |id| c.post_id == id))
        .cloned()
        .collect();
    Json(comments)
}
