//! Log store for the collector server.
//!
//! Two files in the server's working directory are the durable state of
//! the system: a human-readable text log (one delimited block per
//! broadcast) and a structured JSON document holding the full ordered
//! record history. The store also owns the in-memory broadcast counter.
//! Callers serialize access; the server wraps the store in a mutex so no
//! two load-modify-store cycles on the JSON document can interleave.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::broadcast::{content_length, BroadcastPayload, BroadcastRecord};
use crate::error::{Error, Result};

/// Human-readable log file name.
pub const LOG_FILE_NAME: &str = "clipboard_log.txt";

/// Structured log file name.
pub const JSON_LOG_FILE_NAME: &str = "clipboard_log.json";

/// How many records `user_logs` returns at most.
pub const RECENT_LOG_LIMIT: usize = 50;

/// The structured log document: `{"broadcasts": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LogDocument {
    #[serde(default)]
    broadcasts: Vec<BroadcastRecord>,
}

/// Server statistics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStats {
    /// Broadcasts accepted since process start (or last clear).
    pub total_broadcasts: u64,

    /// Current byte size of the human-readable log (0 when missing).
    pub log_file_size: u64,

    /// Current byte size of the structured log (0 when missing).
    pub json_log_size: u64,

    /// ISO-8601 timestamp of server start.
    pub uptime: String,
}

/// Per-user history snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogs {
    /// The queried user id.
    pub user_id: String,

    /// True record count for this user, regardless of the return limit.
    pub total_logs: usize,

    /// Up to the [`RECENT_LOG_LIMIT`] most recent records, in insertion order.
    pub recent_logs: Vec<BroadcastRecord>,

    /// Set when no structured log exists yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Append-only store over the two log files plus the broadcast counter.
#[derive(Debug)]
pub struct LogStore {
    text_path: PathBuf,
    json_path: PathBuf,
    counter: u64,
    started_at: String,
}

impl LogStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is expected to exist; the log files are created on
    /// first append.
    #[must_use]
    pub fn new(log_dir: &Path) -> Self {
        Self {
            text_path: log_dir.join(LOG_FILE_NAME),
            json_path: log_dir.join(JSON_LOG_FILE_NAME),
            counter: 0,
            started_at: Utc::now().to_rfc3339(),
        }
    }

    /// Path of the human-readable log.
    #[must_use]
    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    /// Path of the structured log.
    #[must_use]
    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Broadcasts accepted so far.
    #[must_use]
    pub fn total_broadcasts(&self) -> u64 {
        self.counter
    }

    /// Append one broadcast under the given user id.
    ///
    /// The counter always advances; the two file appends are attempted
    /// independently and a failure in either is logged here without
    /// failing the append, so the caller still acknowledges the broadcast.
    pub fn append(&mut self, user_id: &str, payload: &BroadcastPayload) -> BroadcastRecord {
        self.counter += 1;
        let server_timestamp = Utc::now().to_rfc3339();
        let record = BroadcastRecord {
            sequence: self.counter,
            user_id: user_id.to_string(),
            client_timestamp: payload
                .timestamp
                .clone()
                .unwrap_or_else(|| server_timestamp.clone()),
            server_timestamp,
            content: payload.content.clone(),
            content_length: content_length(&payload.content),
        };

        if let Err(e) = self.append_text(&record) {
            error!(error = %e, "error writing to text log");
        }
        if let Err(e) = self.append_json(&record) {
            error!(error = %e, "error writing to JSON log");
        }

        debug!(
            sequence = record.sequence,
            user_id,
            content_length = record.content_length,
            "broadcast appended"
        );
        record
    }

    fn append_text(&self, record: &BroadcastRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.text_path)
            .map_err(|source| Error::log_file(&self.text_path, source))?;

        let block = format!(
            "\n{sep}\nBroadcast #{seq}\nUser ID: {user}\nTimestamp: {client}\n\
             Server Received: {server}\nContent Length: {len} characters\nContent:\n{content}\n",
            sep = "=".repeat(80),
            seq = record.sequence,
            user = record.user_id,
            client = record.client_timestamp,
            server = record.server_timestamp,
            len = record.content_length,
            content = record.content,
        );
        file.write_all(block.as_bytes())
            .map_err(|source| Error::log_file(&self.text_path, source))?;
        Ok(())
    }

    fn append_json(&self, record: &BroadcastRecord) -> Result<()> {
        let mut document = self.load_document()?;
        document.broadcasts.push(record.clone());
        let serialized = serde_json::to_string_pretty(&document)?;
        std::fs::write(&self.json_path, serialized)
            .map_err(|source| Error::log_file(&self.json_path, source))?;
        Ok(())
    }

    fn load_document(&self) -> Result<LogDocument> {
        if !self.json_path.exists() {
            return Ok(LogDocument::default());
        }
        let raw = std::fs::read_to_string(&self.json_path)
            .map_err(|source| Error::log_file(&self.json_path, source))?;
        serde_json::from_str(&raw).map_err(|source| Error::LogCorrupt {
            path: self.json_path.clone(),
            source,
        })
    }

    /// Snapshot the current statistics.
    #[must_use]
    pub fn stats(&self) -> LogStats {
        LogStats {
            total_broadcasts: self.counter,
            log_file_size: file_size(&self.text_path),
            json_log_size: file_size(&self.json_path),
            uptime: self.started_at.clone(),
        }
    }

    /// Recent history for one user id.
    ///
    /// A missing structured log is not an error: the result is empty with a
    /// descriptive message.
    ///
    /// # Errors
    ///
    /// Returns an error when the structured log exists but cannot be read
    /// or parsed.
    pub fn user_logs(&self, user_id: &str) -> Result<UserLogs> {
        if !self.json_path.exists() {
            return Ok(UserLogs {
                user_id: user_id.to_string(),
                total_logs: 0,
                recent_logs: Vec::new(),
                message: Some("No logs found".to_string()),
            });
        }

        let document = self.load_document()?;
        let mut user_records: Vec<BroadcastRecord> = document
            .broadcasts
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();

        let total_logs = user_records.len();
        if total_logs > RECENT_LOG_LIMIT {
            user_records.drain(..total_logs - RECENT_LOG_LIMIT);
        }

        Ok(UserLogs {
            user_id: user_id.to_string(),
            total_logs,
            recent_logs: user_records,
            message: None,
        })
    }

    /// Delete both log files (if present) and reset the counter.
    ///
    /// Idempotent; returns the names of the files actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing file cannot be removed.
    pub fn clear(&mut self) -> Result<Vec<String>> {
        let mut files_cleared = Vec::new();
        for (path, name) in [
            (&self.text_path, LOG_FILE_NAME),
            (&self.json_path, JSON_LOG_FILE_NAME),
        ] {
            if path.exists() {
                std::fs::remove_file(path).map_err(|source| Error::log_file(path, source))?;
                files_cleared.push(name.to_string());
            }
        }
        self.counter = 0;
        info!("log files cleared by admin request");
        Ok(files_cleared)
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map_or(0, |m| m.len())
}
