// src/watch/event.rs

use std::fmt;

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The path started matching the pattern and could be stat'ed.
    Added,
    /// A tracked path could no longer be opened or stat'ed.
    Deleted,
    /// A tracked path is smaller than it was on the previous tick.
    Truncated,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Added => "added",
            EventKind::Deleted => "deleted",
            EventKind::Truncated => "truncated",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observed transition, handed to the consumer by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    kind: EventKind,
    filename: String,
}

impl Event {
    pub fn new(kind: EventKind, filename: impl Into<String>) -> Self {
        Self {
            kind,
            filename: filename.into(),
        }
    }

    pub fn added(filename: impl Into<String>) -> Self {
        Self::new(EventKind::Added, filename)
    }

    pub fn deleted(filename: impl Into<String>) -> Self {
        Self::new(EventKind::Deleted, filename)
    }

    pub fn truncated(filename: impl Into<String>) -> Self {
        Self::new(EventKind::Truncated, filename)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The path exactly as produced by glob expansion.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.filename)
    }
}
