//! The watch source abstraction.
//!
//! Both detection strategies expose the same contract: once started, a
//! source observes the clipboard, runs change detection, and sends each
//! changed text through the provided channel until stopped.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::event::EventSource;
use crate::poll::{PollConfig, PollingSource};

/// Errors that can occur in a watch source.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to access the clipboard.
    #[error("clipboard access failed: {0}")]
    ClipboardAccess(String),

    /// Failed to register for native clipboard change notifications.
    #[error("failed to register clipboard listener: {0}")]
    ListenerSetup(String),

    /// The source is already running.
    #[error("watch source already running")]
    AlreadyRunning,
}

/// Result type for watch source operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Which detection strategy a source implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Native clipboard change notifications.
    Event,
    /// Fixed-interval polling.
    Polling,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Polling => write!(f, "polling"),
        }
    }
}

/// A clipboard watch source.
///
/// Implementations run their observation loop on their own task or thread;
/// `start` returns once the loop is launched. Detected changes (deduplicated
/// by content fingerprint) are sent through the channel. Dropping the
/// receiver stops the loop on its next observation.
pub trait WatchSource: Send {
    /// Which strategy this source implements.
    fn kind(&self) -> SourceKind;

    /// Start observing and send changed clipboard text through `tx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is already running or its native
    /// setup fails.
    fn start(&mut self, tx: mpsc::Sender<String>) -> Result<()>;

    /// Stop the source and release any native registration.
    fn stop(&mut self);

    /// Whether the observation loop is currently running.
    fn is_running(&self) -> bool;
}

impl std::fmt::Debug for dyn WatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSource")
            .field("kind", &self.kind())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Select a watch source by capability probing.
///
/// Prefers native change notifications; falls back to polling when the
/// listener cannot be set up or when `force_polling` is set. The fallback
/// is logged and otherwise transparent to the caller.
#[must_use]
pub fn select_source(force_polling: bool, poll_config: PollConfig) -> Box<dyn WatchSource> {
    if force_polling {
        info!("polling mode forced");
        return Box::new(PollingSource::new(poll_config));
    }

    match EventSource::probe() {
        Ok(source) => {
            info!("using native clipboard change notifications");
            Box::new(source)
        }
        Err(e) => {
            warn!(error = %e, "clipboard listener unavailable, falling back to polling");
            Box::new(PollingSource::new(poll_config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Event.to_string(), "event");
        assert_eq!(SourceKind::Polling.to_string(), "polling");
    }

    #[test]
    fn test_watch_error_display() {
        let err = WatchError::ClipboardAccess("locked".to_string());
        assert_eq!(err.to_string(), "clipboard access failed: locked");

        let err = WatchError::ListenerSetup("no display".to_string());
        assert!(err.to_string().contains("no display"));

        assert_eq!(
            WatchError::AlreadyRunning.to_string(),
            "watch source already running"
        );
    }

    #[test]
    fn test_forced_polling_selection() {
        let source = select_source(true, PollConfig::default());
        assert_eq!(source.kind(), SourceKind::Polling);
        assert!(!source.is_running());
    }
}
