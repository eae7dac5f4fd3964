// src/watch/table.rs

//! Per-file state and the pure reconciliation step of a tick.
//!
//! Nothing in here sleeps or talks to channels: [`WatchTable::reconcile`]
//! takes the glob matches for one tick, stats what it needs through a
//! [`FileSystem`], and returns the events that tick produced, in emission
//! order. The async shell in [`crate::watch::watcher`] owns the table and
//! delivers those events.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::watch::event::Event;

/// Size history for one tracked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedFile {
    previous_size: Option<u64>,
    current_size: u64,
}

impl WatchedFile {
    /// A freshly discovered file: both snapshots hold the first observation.
    pub fn new(size: u64) -> Self {
        Self {
            previous_size: Some(size),
            current_size: size,
        }
    }

    pub fn previous_size(&self) -> Option<u64> {
        self.previous_size
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Record a new observation. Returns true if the file shrank since the
    /// previous one.
    pub fn observe(&mut self, size: u64) -> bool {
        self.previous_size = Some(self.current_size);
        self.current_size = size;
        self.previous_size
            .is_some_and(|prev| self.current_size < prev)
    }
}

/// Tracked paths keyed by the filename the glob produced.
///
/// A path is present if and only if it was matched and stat'ed successfully
/// on the last tick that looked at it.
#[derive(Debug, Default)]
pub struct WatchTable {
    files: BTreeMap<String, WatchedFile>,
}

impl WatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    pub fn get(&self, filename: &str) -> Option<&WatchedFile> {
        self.files.get(filename)
    }

    /// Tracked filenames in lexicographic order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Run one tick against `candidates` (the glob matches for this tick).
    ///
    /// Already-tracked files are checked first, in sorted order, yielding
    /// `Deleted` or `Truncated`. Then candidates not yet tracked are stat'ed
    /// and yield `Added`; a candidate that vanished before its stat is
    /// skipped.
    pub fn reconcile(&mut self, fs: &dyn FileSystem, candidates: &[String]) -> Vec<Event> {
        let mut events = Vec::new();

        let tracked: Vec<String> = self.files.keys().cloned().collect();
        for filename in tracked {
            match fs.file_size(Path::new(&filename)) {
                Err(err) => {
                    trace!(%filename, error = %err, "stat failed for tracked file");
                    self.files.remove(&filename);
                    debug!(%filename, "file deleted");
                    events.push(Event::deleted(filename));
                }
                Ok(size) => {
                    let Some(file) = self.files.get_mut(&filename) else {
                        continue;
                    };
                    if file.observe(size) {
                        debug!(%filename, size, "file truncated");
                        events.push(Event::truncated(filename));
                    }
                }
            }
        }

        for candidate in candidates {
            if self.files.contains_key(candidate) {
                continue;
            }
            match fs.file_size(Path::new(candidate)) {
                Ok(size) => {
                    self.files.insert(candidate.clone(), WatchedFile::new(size));
                    debug!(filename = %candidate, size, "file added");
                    events.push(Event::added(candidate.clone()));
                }
                Err(err) => {
                    trace!(filename = %candidate, error = %err, "candidate vanished before stat");
                }
            }
        }

        events
    }
}
