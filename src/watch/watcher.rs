// src/watch/watcher.rs

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::event::Event;
use crate::watch::patterns::GlobPattern;
use crate::watch::table::WatchTable;

/// Receiving side of a running watcher.
///
/// Events arrive in the order they were observed. `recv` returns `None` once
/// the watcher has stopped, and never yields anything after the paired
/// [`CancelHandle`] has been triggered.
pub struct EventStream {
    rx: mpsc::Receiver<Event>,
    cancel_rx: watch::Receiver<bool>,
    ticks: Arc<AtomicU64>,
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("cancelled", &*self.cancel_rx.borrow())
            .field("ticks", &self.ticks())
            .finish_non_exhaustive()
    }
}

impl EventStream {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<Event> {
        if *self.cancel_rx.borrow() {
            self.rx.close();
            return None;
        }

        tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => {
                self.rx.close();
                None
            }
            event = self.rx.recv() => event,
        }
    }

    /// Number of ticks the watcher has started so far, including ticks
    /// where the pattern failed to compile.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

/// Requests a running watcher to stop.
///
/// Cancelling is idempotent and can be done from any clone. Dropping every
/// handle without cancelling leaves the watcher running until its
/// [`EventStream`] is dropped.
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        if !self.tx.send_replace(true) {
            debug!("cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Polls a glob pattern and reports files that appear, shrink or disappear.
///
/// ```no_run
/// # async fn demo() {
/// use std::time::Duration;
/// use globwatch::watch::GlobWatcher;
///
/// let (mut events, cancel) = GlobWatcher::new("/var/log/app/*.log", Duration::from_secs(1)).start();
/// while let Some(event) = events.recv().await {
///     println!("{event}");
/// #   cancel.cancel();
/// }
/// # }
/// ```
pub struct GlobWatcher {
    pattern: String,
    poll_interval: Duration,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for GlobWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobWatcher")
            .field("pattern", &self.pattern)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl GlobWatcher {
    /// A zero `poll_interval` ticks as fast as the runtime allows.
    pub fn new(pattern: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            pattern: pattern.into(),
            poll_interval,
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Use a different filesystem backend (e.g. `MockFileSystem` in tests).
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Spawn the poll loop on the current tokio runtime and return at once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> (EventStream, CancelHandle) {
        spawn_watcher(self.pattern, self.poll_interval, self.fs)
    }
}

/// Convenience for `GlobWatcher::new(pattern, poll_interval).start()`.
pub fn start(pattern: impl Into<String>, poll_interval: Duration) -> (EventStream, CancelHandle) {
    GlobWatcher::new(pattern, poll_interval).start()
}

/// Spawn a watcher over an explicit filesystem.
pub fn spawn_watcher(
    pattern: impl Into<String>,
    poll_interval: Duration,
    fs: Arc<dyn FileSystem>,
) -> (EventStream, CancelHandle) {
    // Capacity one plus waiting for the slot to free up again gives
    // hand-off semantics: an emit completes only once the consumer took it.
    let (event_tx, event_rx) = mpsc::channel::<Event>(1);
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let ticks = Arc::new(AtomicU64::new(0));

    let watch_loop = WatchLoop {
        pattern: pattern.into(),
        compiled: None,
        poll_interval,
        fs,
        table: WatchTable::new(),
        event_tx,
        cancel_rx: cancel_rx.clone(),
        ticks: Arc::clone(&ticks),
    };
    tokio::spawn(watch_loop.run());

    (
        EventStream {
            rx: event_rx,
            cancel_rx,
            ticks,
        },
        CancelHandle {
            tx: Arc::new(cancel_tx),
        },
    )
}

/// State owned by the background task. The table only leaves it for the
/// blocking half of a tick.
struct WatchLoop {
    pattern: String,
    compiled: Option<GlobPattern>,
    poll_interval: Duration,
    fs: Arc<dyn FileSystem>,
    table: WatchTable,
    event_tx: mpsc::Sender<Event>,
    cancel_rx: watch::Receiver<bool>,
    ticks: Arc<AtomicU64>,
}

impl WatchLoop {
    async fn run(mut self) {
        info!(pattern = %self.pattern, interval = ?self.poll_interval, "glob watcher started");

        while self.tick().await && self.wait().await {}

        info!(
            pattern = %self.pattern,
            ticks = self.ticks.load(Ordering::Relaxed),
            abandoned = self.table.len(),
            "glob watcher stopped"
        );
        // Dropping `event_tx` here closes the stream.
    }

    /// One pass over the pattern. Returns false if the loop should stop.
    async fn tick(&mut self) -> bool {
        if self.event_tx.is_closed() {
            debug!("event stream dropped");
            return false;
        }
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        let Some(pattern) = self.compiled_pattern(tick) else {
            return true;
        };

        // Directory walks and stats block, so they run off the async workers.
        let fs = Arc::clone(&self.fs);
        let mut table = std::mem::take(&mut self.table);
        let scan = tokio::task::spawn_blocking(move || {
            let candidates = pattern.expand(fs.as_ref());
            let events = table.reconcile(fs.as_ref(), &candidates);
            (table, candidates.len(), events)
        });

        let joined = tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => return false,
            joined = scan => joined,
        };
        let (table, matches, events) = match joined {
            Ok(result) => result,
            Err(err) => {
                warn!(tick, error = %err, "tick failed; tracked files were reset");
                return true;
            }
        };
        self.table = table;

        debug!(
            tick,
            matches,
            tracked = self.table.len(),
            events = events.len(),
            "tick complete"
        );

        for event in events {
            if !self.emit(event).await {
                return false;
            }
        }
        true
    }

    /// Compile the pattern if needed. A malformed pattern is retried on every
    /// tick; only the first failure is logged at `warn`.
    fn compiled_pattern(&mut self, tick: u64) -> Option<GlobPattern> {
        if let Some(pattern) = &self.compiled {
            return Some(pattern.clone());
        }

        match GlobPattern::compile(&self.pattern) {
            Ok(pattern) => {
                self.compiled = Some(pattern.clone());
                Some(pattern)
            }
            Err(err) => {
                if tick == 1 {
                    warn!(error = %err, "glob expansion failed; will keep retrying");
                } else {
                    debug!(tick, error = %err, "glob expansion failed");
                }
                None
            }
        }
    }

    /// Hand one event to the consumer. Returns false on cancellation or when
    /// the stream has been dropped.
    async fn emit(&mut self, event: Event) -> bool {
        let permit = tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => return false,
            permit = self.event_tx.reserve() => permit,
        };
        match permit {
            Ok(permit) => permit.send(event),
            Err(_) => {
                debug!("event stream dropped");
                return false;
            }
        }

        // The slot frees up once the consumer has taken the event.
        tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => false,
            taken = self.event_tx.reserve() => taken.is_ok(),
        }
    }

    /// Sleep until the next tick. Returns false on cancellation.
    async fn wait(&mut self) -> bool {
        if self.poll_interval.is_zero() {
            tokio::task::yield_now().await;
            return !*self.cancel_rx.borrow();
        }

        tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => false,
            _ = tokio::time::sleep(self.poll_interval) => true,
        }
    }
}

/// Resolves once cancellation is requested. Never resolves if every
/// `CancelHandle` was dropped without cancelling.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
