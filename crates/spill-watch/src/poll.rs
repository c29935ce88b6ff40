//! Polling watch source.
//!
//! Fallback strategy for hosts where native clipboard notifications are
//! unavailable: re-read the clipboard on a fixed interval and run change
//! detection on each successful read. A failed read extends the next wait
//! but never stops the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::detect::ChangeDetector;
use crate::reader::read_text;
use crate::source::{Result, SourceKind, WatchError, WatchSource};

/// Timing configuration for the polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between clipboard reads.
    pub interval: Duration,

    /// Wait before the next read after a failed one.
    pub error_backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            error_backoff: Duration::from_secs(1),
        }
    }
}

/// Watch source that polls the clipboard at a fixed interval.
#[derive(Debug)]
pub struct PollingSource {
    config: PollConfig,
    running: Arc<AtomicBool>,
}

impl PollingSource {
    /// Create a polling source with the given timing.
    #[must_use]
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl WatchSource for PollingSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Polling
    }

    fn start(&mut self, tx: mpsc::Sender<String>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(WatchError::AlreadyRunning);
        }

        debug!(
            interval_ms = self.config.interval.as_millis(),
            "starting polling source"
        );

        let config = self.config.clone();
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let mut detector = ChangeDetector::new();
            if let Some(text) = crate::reader::read_text_silent() {
                detector.prime(&text);
            }

            let mut wait = config.interval;
            while running.load(Ordering::SeqCst) {
                tokio::time::sleep(wait).await;
                wait = config.interval;

                match read_text() {
                    Ok(Some(text)) => {
                        if detector.observe(&text) && tx.send(text).await.is_err() {
                            debug!("change channel closed, stopping polling source");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Tolerated indefinitely; just poll less eagerly.
                        warn!(error = %e, "poll cycle failed, backing off");
                        wait = config.error_backoff;
                    }
                }
            }

            running.store(false, Ordering::SeqCst);
            debug!("polling source stopped");
        });

        Ok(())
    }

    fn stop(&mut self) {
        debug!("stopping polling source");
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
