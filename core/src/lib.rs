//! Client core for the JSONPlaceholder post and comment screens.
//!
//! # Overview
//! Two screens, each a small unidirectional loop: the host sends events,
//! feedback units turn published states into side effects, and a pure
//! `reduce` folds every event into the next state.
//!
//! # Design
//! - `JphClient` builds `HttpRequest` values and parses `HttpResponse` values;
//!   a blocking `Transport` does the round trip on Tokio's blocking pool.
//! - `System` is the generic loop. It owns the state and is its only writer.
//! - `Feedback::effects` gives switch-to-latest: a new state cancels the
//!   effect started for the previous one, and the loop drops any event
//!   stamped with a state that is no longer the latest.
//! - `PostsScreen` and `CommentsScreen` are the two concrete loops.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod comments;
pub mod config;
pub mod error;
pub mod feedback;
pub mod http;
pub mod posts;
pub mod screen;
pub mod system;
pub mod transport;
pub mod types;

pub use client::JphClient;
pub use comments::{CommentsEvent, CommentsScreen, CommentsState};
pub use config::Config;
pub use error::{ApiError, TransportError};
pub use feedback::Feedback;
pub use http::{HttpRequest, HttpResponse};
pub use posts::{PostsEvent, PostsScreen, PostsState};
pub use screen::Screen;
pub use system::{StateStream, System};
pub use transport::{Transport, UreqTransport};
pub use types::{Comment, ListItem, Post};
