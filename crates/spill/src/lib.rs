//! `spill` - relay clipboard content to a central collection server
//!
//! This library provides the two halves of the relay: a clipboard monitor
//! that detects content changes and broadcasts them over HTTP, and a
//! collector server that appends every broadcast to durable logs and
//! exposes statistics and per-user history.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod broadcast;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod server;
pub mod storage;

pub use broadcast::{BroadcastAck, BroadcastPayload, BroadcastRecord};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{LogStats, LogStore};
