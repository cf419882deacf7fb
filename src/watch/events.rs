// src/watch/events.rs

//! Translation of raw `notify` events into the bridge's event kinds.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// What happened to a path, as far as the bridge cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEventKind {
    Created,
    Removed,
    Modified,
    /// The path was the source of a rename.
    RenamedAway,
    /// A rename whose direction the backend did not report (e.g. FSEvents).
    Renamed,
    /// The backend dropped events; the whole tree must be re-read.
    Rescan,
}

/// A single-path event ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: FsEventKind,
    pub path: PathBuf,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Split a `notify` event into per-path bridge events, in path order.
///
/// Access events carry no content change and produce nothing.
pub fn translate(event: Event) -> Vec<FsEvent> {
    if event.need_rescan() {
        return vec![FsEvent::new(FsEventKind::Rescan, PathBuf::new())];
    }

    let per_path = |kind: FsEventKind, paths: Vec<PathBuf>| -> Vec<FsEvent> {
        paths.into_iter().map(|p| FsEvent::new(kind, p)).collect()
    };

    match event.kind {
        EventKind::Access(_) => Vec::new(),
        EventKind::Create(_) => per_path(FsEventKind::Created, event.paths),
        EventKind::Remove(_) => per_path(FsEventKind::Removed, event.paths),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => per_path(FsEventKind::RenamedAway, event.paths),
            RenameMode::To => per_path(FsEventKind::Created, event.paths),
            RenameMode::Both => {
                let mut paths = event.paths.into_iter();
                let mut out = Vec::with_capacity(2);
                if let Some(from) = paths.next() {
                    out.push(FsEvent::new(FsEventKind::RenamedAway, from));
                }
                out.extend(paths.map(|to| FsEvent::new(FsEventKind::Created, to)));
                out
            }
            RenameMode::Any | RenameMode::Other => per_path(FsEventKind::Renamed, event.paths),
        },
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            per_path(FsEventKind::Modified, event.paths)
        }
    }
}
