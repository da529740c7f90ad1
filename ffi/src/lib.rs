//! C-ABI wrapper around `jph-core`'s screens.
//!
//! # Overview
//! Lets a native host (any language with a C FFI) open the post list or a
//! comment list, tell it that it appeared, and poll state snapshots to
//! render, without linking to Rust's async runtime directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Each screen handle owns a small multi-thread Tokio runtime on which its
//!   loop and fetches run; the host thread never blocks on I/O.
//! - State is exposed as polled `FfiScreenState` snapshots rather than
//!   callbacks, so no Rust thread ever calls into the host.
//! - The C caller owns all returned pointers and must call the matching
//!   `jph_*_free` function to release them.
//! - `build.rs` generates the C header `jph.h` with cbindgen into the build's
//!   `OUT_DIR`; its path is exported to the crate as `JPH_FFI_HEADER`.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use jph_core::{CommentsEvent, CommentsScreen, Config, JphClient, PostsEvent, PostsScreen};
use tokio::runtime::Runtime;

use types::*;

// ---------------------------------------------------------------------------
// Screen lifecycle
// ---------------------------------------------------------------------------

/// Resolve the base URL argument. Null falls back to `JPH_BASE_URL` or the
/// public API address.
fn client_for(base_url: *const c_char) -> Option<JphClient> {
    let config = if base_url.is_null() {
        Config::from_env()
    } else {
        let url = unsafe { CStr::from_ptr(base_url) }.to_str().ok()?;
        Config {
            base_url: url.to_string(),
        }
    };
    JphClient::from_config(&config).ok()
}

fn runtime() -> Option<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("jph-screen")
        .enable_all()
        .build()
        .ok()
}

fn open(base_url: *const c_char, make: impl FnOnce(JphClient) -> ScreenKind) -> *mut FfiScreen {
    let Some(client) = client_for(base_url) else {
        return std::ptr::null_mut();
    };
    let Some(runtime) = runtime() else {
        return std::ptr::null_mut();
    };
    let screen = {
        let _guard = runtime.enter();
        make(client)
    };
    Box::into_raw(Box::new(FfiScreen {
        screen: Some(screen),
        runtime: Some(runtime),
    }))
}

/// Open the post list in its idle state.
///
/// `base_url` may be null to use the configured default. Returns null if the
/// URL is invalid or if an internal panic occurs.
/// The caller must free the returned pointer with `jph_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn jph_posts_screen_new(base_url: *const c_char) -> *mut FfiScreen {
    catch_unwind(|| open(base_url, |client| ScreenKind::Posts(PostsScreen::new(client))))
        .unwrap_or(std::ptr::null_mut())
}

/// Open the comment list of `post_id` in its idle state.
///
/// Same contract as `jph_posts_screen_new`.
#[unsafe(no_mangle)]
pub extern "C" fn jph_comments_screen_new(base_url: *const c_char, post_id: i64) -> *mut FfiScreen {
    catch_unwind(|| {
        open(base_url, |client| {
            ScreenKind::Comments(CommentsScreen::new(client, post_id))
        })
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen created by `jph_*_screen_new`. Cancels any fetch still in
/// flight. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jph_screen_free(screen: *mut FfiScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(screen) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Tell the screen it became visible. Call once per appearance.
///
/// Returns `NullArg` if `screen` is null, `Panic` if an internal panic occurs.
#[unsafe(no_mangle)]
pub extern "C" fn jph_screen_appeared(screen: *const FfiScreen) -> FfiErrorCode {
    if screen.is_null() {
        return FfiErrorCode::NullArg;
    }
    let screen = unsafe { &*screen };
    catch_unwind(AssertUnwindSafe(|| {
        match &screen.screen {
            Some(ScreenKind::Posts(s)) => s.send(PostsEvent::Appeared),
            Some(ScreenKind::Comments(s)) => s.send(CommentsEvent::Appeared),
            None => return FfiErrorCode::NullArg,
        }
        FfiErrorCode::Ok
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Snapshot the screen's current state.
///
/// Never returns null. A null `screen` yields a `Failed` snapshot with
/// `error_code = NullArg`. The caller must free the result with
/// `jph_screen_state_free`.
#[unsafe(no_mangle)]
pub extern "C" fn jph_screen_snapshot(screen: *const FfiScreen) -> *mut FfiScreenState {
    if screen.is_null() {
        return FfiScreenState::call_failed(FfiErrorCode::NullArg, "null argument: screen");
    }
    let screen = unsafe { &*screen };
    catch_unwind(AssertUnwindSafe(|| match &screen.screen {
        Some(ScreenKind::Posts(s)) => FfiScreenState::from_posts(&s.state()),
        Some(ScreenKind::Comments(s)) => FfiScreenState::from_comments(&s.state()),
        None => FfiScreenState::call_failed(FfiErrorCode::NullArg, "screen already closed"),
    }))
    .unwrap_or_else(|_| FfiScreenState::call_failed(FfiErrorCode::Panic, "panic in jph_screen_snapshot"))
}

/// Free a snapshot returned by `jph_screen_snapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn jph_screen_state_free(state: *mut FfiScreenState) {
    if state.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let state = unsafe { Box::from_raw(state) };
        free_c_string(state.error_message);
        if !state.items.is_null() {
            let items = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(state.items, state.items_len))
            };
            for item in items.iter() {
                free_c_string(item.title);
                free_c_string(item.description);
            }
        }
    });
}

fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { std::ffi::CString::from_raw(ptr) });
    }
}
