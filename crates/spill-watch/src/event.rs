//! Event-driven watch source.
//!
//! Registers for native clipboard change notifications through
//! `clipboard-rs`. On each notification the clipboard is re-read and run
//! through change detection, so a write that restores identical content
//! produces no change. The native watch loop is blocking and runs on a
//! dedicated blocking task; a shutdown channel releases the registration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clipboard_rs::{ClipboardHandler, ClipboardWatcher, ClipboardWatcherContext, WatcherShutdown};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::detect::ChangeDetector;
use crate::reader::read_text_silent;
use crate::source::{Result, SourceKind, WatchError, WatchSource};

/// Handler invoked by the native watcher on every clipboard update.
struct ChangeForwarder {
    detector: ChangeDetector,
    tx: mpsc::Sender<String>,
}

impl ChangeForwarder {
    fn new(tx: mpsc::Sender<String>) -> Self {
        let mut detector = ChangeDetector::new();
        if let Some(text) = read_text_silent() {
            detector.prime(&text);
        }
        Self { detector, tx }
    }
}

impl ClipboardHandler for ChangeForwarder {
    fn on_clipboard_change(&mut self) {
        let Some(text) = read_text_silent() else {
            return;
        };

        if !self.detector.observe(&text) {
            return;
        }

        // Runs on the blocking watcher thread, so a blocking send is fine.
        if self.tx.blocking_send(text).is_err() {
            warn!("change channel closed, dropping clipboard update");
        }
    }
}

/// Watch source backed by native clipboard change notifications.
pub struct EventSource {
    watcher: Option<ClipboardWatcherContext<ChangeForwarder>>,
    shutdown: Option<WatcherShutdown>,
    running: Arc<AtomicBool>,
}

impl EventSource {
    /// Probe for native notification support.
    ///
    /// Creating the watcher context is the capability check; on hosts
    /// without notification support this fails and the caller falls back
    /// to polling.
    ///
    /// # Errors
    ///
    /// Returns an error when the native listener cannot be set up.
    pub fn probe() -> Result<Self> {
        let watcher = ClipboardWatcherContext::new()
            .map_err(|e| WatchError::ListenerSetup(e.to_string()))?;
        Ok(Self {
            watcher: Some(watcher),
            shutdown: None,
            running: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl WatchSource for EventSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Event
    }

    fn start(&mut self, tx: mpsc::Sender<String>) -> Result<()> {
        let Some(mut watcher) = self.watcher.take() else {
            return Err(WatchError::AlreadyRunning);
        };

        let shutdown = watcher.add_handler(ChangeForwarder::new(tx)).get_shutdown_channel();
        self.shutdown = Some(shutdown);
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        tokio::task::spawn_blocking(move || {
            debug!("clipboard watch started");
            watcher.start_watch();
            running.store(false, Ordering::SeqCst);
            debug!("clipboard watch stopped");
        });

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            debug!("releasing clipboard listener");
            shutdown.stop();
        }
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("started", &self.watcher.is_none())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
