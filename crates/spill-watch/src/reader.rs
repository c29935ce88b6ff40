//! Clipboard text access.

use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};
use tracing::debug;

use crate::source::{Result, WatchError};

/// Read the current text content of the system clipboard.
///
/// Returns `Ok(None)` when the clipboard holds no text format at all (a
/// non-text payload such as an image, or nothing). When a text format is
/// present its content is returned even if it is the empty string, so a
/// transition from non-empty to empty text is observable downstream. A
/// fresh clipboard context is opened per read; the contexts are cheap and
/// holding one long-term keeps a native clipboard handle open.
///
/// # Errors
///
/// Returns an error only when the clipboard itself is unavailable, for
/// example when it is locked by another process.
pub fn read_text() -> Result<Option<String>> {
    let ctx = ClipboardContext::new().map_err(|e| WatchError::ClipboardAccess(e.to_string()))?;

    if !ctx.has(ContentFormat::Text) {
        return Ok(None);
    }
    // A text format may still fail to decode; that is absence, not an error
    Ok(ctx.get_text().ok())
}

/// Read the clipboard, treating any failure as "no text".
///
/// Failures are logged and swallowed; callers that need to distinguish an
/// access error from absent text (the polling loop does, for its error
/// backoff) use [`read_text`] directly.
#[must_use]
pub fn read_text_silent() -> Option<String> {
    match read_text() {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "clipboard read failed");
            None
        }
    }
}
