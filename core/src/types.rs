//! Domain DTOs for the JSONPlaceholder API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Field names follow the API's camelCase on the wire. Integration tests catch
//! any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single post returned by `GET /posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// A comment returned by `GET /comments?postId=<id>`. Belongs to the post
/// whose `id` equals `post_id`; comments are fetched per post, never nested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: i64,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Row model shared by every list the screens produce.
pub trait ListItem {
    /// Leading number shown beside the row.
    fn counter(&self) -> i64;
    fn title(&self) -> String;
    fn description(&self) -> String;
}

impl ListItem for Post {
    fn counter(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn description(&self) -> String {
        self.body.clone()
    }
}

impl ListItem for Comment {
    fn counter(&self) -> i64 {
        self.id
    }

    fn title(&self) -> String {
        format!("{}({})", self.name, self.email)
    }

    fn description(&self) -> String {
        self.body.clone()
    }
}
