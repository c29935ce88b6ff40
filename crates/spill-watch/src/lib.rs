//! Clipboard change detection for spill.
//!
//! This crate isolates the clipboard mechanics from the broadcast logic:
//! reading text from the system clipboard, fingerprinting content for
//! change detection, and the two interchangeable watch sources (native
//! change notifications and interval polling) that feed detected changes
//! into a channel.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod detect;
pub mod event;
pub mod poll;
pub mod reader;
pub mod source;

pub use detect::{fingerprint, ChangeDetector};
pub use event::EventSource;
pub use poll::{PollConfig, PollingSource};
pub use reader::{read_text, read_text_silent};
pub use source::{select_source, SourceKind, WatchError, WatchSource};
