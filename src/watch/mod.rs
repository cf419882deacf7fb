// src/watch/mod.rs

//! File watching and cache invalidation.
//!
//! This module is responsible for:
//! - Translating `notify` events into a small closed set of kinds.
//! - Maintaining one non-recursive subscription per live directory.
//! - Turning create/modify/remove/rename events into store updates.
//!
//! It never answers lookups; that is the store's job.

pub mod bridge;
pub mod events;
pub mod watcher;

pub use bridge::{DirectoryWatcher, WatchBridge};
pub use events::{translate, FsEvent, FsEventKind};
pub use watcher::{run_bridge, spawn_bridge, BridgeHandle};
