// src/watch/mod.rs

//! Polling glob watcher.
//!
//! This module is responsible for:
//! - Compiling and expanding a shell-style glob pattern (`patterns`).
//! - Tracking the size of every matched file between ticks (`table`).
//! - Running the poll loop on a background task and handing events to the
//!   consumer one at a time, with cooperative cancellation (`watcher`).
//!
//! It does **not** use OS-native change notification; every observation comes
//! from re-running the glob and re-stating files on each tick.

pub mod event;
pub mod patterns;
pub mod table;
pub mod watcher;

pub use event::{Event, EventKind};
pub use patterns::GlobPattern;
pub use table::{WatchTable, WatchedFile};
pub use watcher::{spawn_watcher, start, CancelHandle, EventStream, GlobWatcher};
