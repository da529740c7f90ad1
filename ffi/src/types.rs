//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, boxed slices instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use jph_core::{ApiError, CommentsScreen, CommentsState, ListItem, PostsScreen, PostsState};
use tokio::runtime::Runtime;

pub(crate) enum ScreenKind {
    Posts(PostsScreen),
    Comments(CommentsScreen),
}

/// Opaque handle to one screen. Owns the Tokio runtime its loop runs on, so
/// every handle is fully independent.
pub struct FfiScreen {
    pub(crate) screen: Option<ScreenKind>,
    pub(crate) runtime: Option<Runtime>,
}

impl Drop for FfiScreen {
    fn drop(&mut self) {
        // Tear the loop down first, then let blocked fetches finish on their own.
        drop(self.screen.take());
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Which variant a screen is in.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStateTag {
    Idle = 0,
    Loading = 1,
    Loaded = 2,
    Failed = 3,
}

/// Error codes carried by `FfiScreenState` and returned by commands.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Decode = 1,
    MissingOutput = 2,
    Transport = 3,
    Status = 4,
    InvalidUrl = 5,
    Panic = 6,
    NullArg = 7,
}

impl From<&ApiError> for FfiErrorCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Decode(_) => FfiErrorCode::Decode,
            ApiError::MissingOutput => FfiErrorCode::MissingOutput,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Status { .. } => FfiErrorCode::Status,
            ApiError::InvalidUrl(_) => FfiErrorCode::InvalidUrl,
        }
    }
}

/// One list row, for a post or a comment alike.
#[repr(C)]
pub struct FfiItem {
    pub counter: i64,
    pub title: *mut c_char,
    pub description: *mut c_char,
}

/// Snapshot of a screen's state.
///
/// `items` is non-null only when `tag` is `Loaded` and the list is not empty.
/// `error_message` is non-null only when `error_code` is not `Ok`.
#[repr(C)]
pub struct FfiScreenState {
    pub tag: FfiStateTag,
    pub items: *mut FfiItem,
    pub items_len: usize,
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    /// HTTP status for `Status` errors, 0 otherwise.
    pub http_status: u16,
}

/// Interior NULs cannot cross into C; such strings become empty.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

impl FfiScreenState {
    fn bare(tag: FfiStateTag) -> Self {
        FfiScreenState {
            tag,
            items: std::ptr::null_mut(),
            items_len: 0,
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
        }
    }

    fn loaded<T: ListItem>(rows: &[T]) -> Self {
        let items: Box<[FfiItem]> = rows
            .iter()
            .map(|row| FfiItem {
                counter: row.counter(),
                title: c_string(row.title()),
                description: c_string(row.description()),
            })
            .collect();
        let items_len = items.len();
        let items = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(items) as *mut FfiItem
        };
        FfiScreenState {
            items,
            items_len,
            ..Self::bare(FfiStateTag::Loaded)
        }
    }

    fn failed(err: &ApiError) -> Self {
        let http_status = match err {
            ApiError::Status { status, .. } => *status,
            _ => 0,
        };
        FfiScreenState {
            error_code: err.into(),
            error_message: c_string(err.to_string()),
            http_status,
            ..Self::bare(FfiStateTag::Failed)
        }
    }

    pub(crate) fn from_posts(state: &PostsState) -> *mut Self {
        let snapshot = match state {
            PostsState::Idle => Self::bare(FfiStateTag::Idle),
            PostsState::Loading => Self::bare(FfiStateTag::Loading),
            PostsState::Loaded(posts) => Self::loaded(posts),
            PostsState::Failed(err) => Self::failed(err),
        };
        Box::into_raw(Box::new(snapshot))
    }

    pub(crate) fn from_comments(state: &CommentsState) -> *mut Self {
        let snapshot = match state {
            CommentsState::Idle(_) => Self::bare(FfiStateTag::Idle),
            CommentsState::Loading(_) => Self::bare(FfiStateTag::Loading),
            CommentsState::Loaded(comments) => Self::loaded(comments),
            CommentsState::Failed(err) => Self::failed(err),
        };
        Box::into_raw(Box::new(snapshot))
    }

    /// Snapshot describing a failure of the FFI call itself.
    pub(crate) fn call_failed(code: FfiErrorCode, msg: &str) -> *mut Self {
        let snapshot = FfiScreenState {
            error_code: code,
            error_message: c_string(msg.to_string()),
            ..Self::bare(FfiStateTag::Failed)
        };
        Box::into_raw(Box::new(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jph_core::Post;

    fn post(id: i64) -> Post {
        Post {
            user_id: 1,
            id,
            title: format!("post {id}"),
            body: String::new(),
        }
    }

    #[test]
    fn loaded_snapshot_reports_every_row() {
        let posts: Vec<Post> = (1..=70_000).map(post).collect();
        let state = FfiScreenState::from_posts(&PostsState::Loaded(posts));

        let state_ref = unsafe { &*state };
        assert_eq!(state_ref.tag, FfiStateTag::Loaded);
        assert_eq!(state_ref.items_len, 70_000);
        let items = unsafe { std::slice::from_raw_parts(state_ref.items, state_ref.items_len) };
        assert_eq!(items[69_999].counter, 70_000);

        crate::jph_screen_state_free(state);
    }

    #[test]
    fn empty_list_has_no_items_pointer() {
        let state = FfiScreenState::from_posts(&PostsState::Loaded(Vec::new()));

        let state_ref = unsafe { &*state };
        assert_eq!(state_ref.tag, FfiStateTag::Loaded);
        assert_eq!(state_ref.items_len, 0);
        assert!(state_ref.items.is_null());

        crate::jph_screen_state_free(state);
    }
}
