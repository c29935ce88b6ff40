//! Content fingerprinting and change detection.
//!
//! A change is a transition of the clipboard's content fingerprint relative
//! to the immediately preceding observation. Writing the same text back to
//! the clipboard is not a change; restoring an earlier text after something
//! else was observed is.

use tracing::trace;

/// Compute the fingerprint of clipboard content.
///
/// BLAKE3 hex digest, used only for equality comparison between
/// consecutive observations. Not a security boundary.
#[must_use]
pub fn fingerprint(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// Tracks the fingerprint of the last observed clipboard content.
///
/// Ephemeral, client-side only. The detector is primed with whatever is on
/// the clipboard at startup so pre-existing content is not treated as a
/// change.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last_fingerprint: Option<String>,
}

impl ChangeDetector {
    /// Create a detector with no prior observation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current content without treating it as a change.
    pub fn prime(&mut self, content: &str) {
        self.last_fingerprint = Some(fingerprint(content));
    }

    /// Observe clipboard content and report whether it changed.
    ///
    /// Returns `true` (and updates the stored fingerprint) when the content
    /// differs from the previous observation. The very first observation of
    /// an unprimed detector counts as a change.
    pub fn observe(&mut self, content: &str) -> bool {
        let digest = fingerprint(content);
        if self.last_fingerprint.as_deref() == Some(digest.as_str()) {
            trace!("clipboard content unchanged");
            return false;
        }
        self.last_fingerprint = Some(digest);
        true
    }

    /// Fingerprint of the last observed content, if any.
    #[must_use]
    pub fn last_fingerprint(&self) -> Option<&str> {
        self.last_fingerprint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
        assert_ne!(fingerprint("hello"), fingerprint("hello "));
    }

    #[test]
    fn test_first_observation_is_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe("hello"));
    }

    #[test]
    fn test_repeated_content_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe("hello"));
        assert!(!detector.observe("hello"));
        assert!(!detector.observe("hello"));
    }

    #[test]
    fn test_each_transition_is_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe("x"));
        assert!(detector.observe("y"));
        // Returning to earlier content still counts: comparison is against
        // the immediately preceding observation only.
        assert!(detector.observe("x"));
    }

    #[test]
    fn test_primed_content_is_not_rebroadcast() {
        let mut detector = ChangeDetector::new();
        detector.prime("startup content");
        assert!(!detector.observe("startup content"));
        assert!(detector.observe("new content"));
    }

    #[test]
    fn test_empty_content_is_observable() {
        // An emptied clipboard that still carries a text format is a
        // transition like any other, in both directions.
        let mut detector = ChangeDetector::new();
        assert!(detector.observe("hello"));
        assert!(detector.observe(""));
        assert!(!detector.observe(""));
        assert!(detector.observe("hello again"));
    }

    #[test]
    fn test_last_fingerprint_tracks_observations() {
        let mut detector = ChangeDetector::new();
        assert!(detector.last_fingerprint().is_none());

        detector.observe("hello");
        assert_eq!(detector.last_fingerprint(), Some(fingerprint("hello").as_str()));
    }

    #[test]
    fn test_unicode_content() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe("héllo 🌍\nline two"));
        assert!(!detector.observe("héllo 🌍\nline two"));
    }
}
