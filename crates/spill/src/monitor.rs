//! Clipboard monitor and broadcaster.
//!
//! Wires a watch source (native notifications, or polling as fallback) to
//! the collector: every deduplicated clipboard change is handed to an
//! independent broadcast task that POSTs it to the server and terminates.
//! Broadcast tasks are fire-and-forget; the detection loop never blocks on
//! network I/O, and a failed broadcast is logged and lost by design.

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use spill_watch::{select_source, PollConfig};

use crate::broadcast::{content_length, BroadcastPayload};
use crate::config::Config;
use crate::error::{Error, Result};

/// Longest content preview written to the monitor log.
const PREVIEW_LEN: usize = 50;

/// Buffered changes between the watch source and the dispatch loop.
const CHANGE_CHANNEL_CAPACITY: usize = 32;

/// Run the clipboard monitor until interrupted.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be constructed or the
/// selected watch source fails to start. Per-broadcast failures are logged
/// and never returned.
pub async fn run(config: &Config) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

    let endpoint = config.broadcast_endpoint();
    info!(
        endpoint,
        user_id = config.monitor.user_id,
        "starting clipboard monitor"
    );

    probe_server(&client, config.server_url()).await;

    let (tx, mut rx) = mpsc::channel::<String>(CHANGE_CHANNEL_CAPACITY);
    let mut source = select_source(
        config.monitor.force_polling,
        PollConfig {
            interval: config.poll_interval(),
            error_backoff: config.error_backoff(),
        },
    );
    source.start(tx)?;
    info!(source = %source.kind(), "watching clipboard, press ctrl-c to stop");

    loop {
        tokio::select! {
            change = rx.recv() => {
                match change {
                    Some(content) => dispatch(&client, &endpoint, &config.monitor.user_id, content),
                    None => {
                        warn!("watch source closed its channel, stopping");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stop requested");
                break;
            }
        }
    }

    // Releases any native registration; in-flight broadcast tasks are
    // abandoned, not cancelled.
    source.stop();
    info!("clipboard monitoring stopped");
    Ok(())
}

/// Spawn an independent broadcast task for one detected change.
fn dispatch(client: &reqwest::Client, endpoint: &str, user_id: &str, content: String) {
    let preview: String = content.chars().take(PREVIEW_LEN).collect();
    debug!(
        content_length = content_length(&content),
        preview, "clipboard changed"
    );

    let client = client.clone();
    let endpoint = endpoint.to_string();
    let payload = BroadcastPayload {
        timestamp: Some(Utc::now().to_rfc3339()),
        user_id: Some(user_id.to_string()),
        content,
    };

    tokio::spawn(async move {
        send_broadcast(&client, &endpoint, &payload).await;
    });
}

/// POST one broadcast to the collector. Errors are logged and swallowed:
/// no retry, no backoff, no queuing.
async fn send_broadcast(client: &reqwest::Client, endpoint: &str, payload: &BroadcastPayload) {
    match client.post(endpoint).json(payload).send().await {
        Ok(response) if response.status().is_success() => {
            info!(
                content_length = content_length(&payload.content),
                "broadcasted clipboard content"
            );
        }
        Ok(response) => {
            warn!(status = %response.status(), "server rejected broadcast");
        }
        Err(e) => {
            warn!(error = %e, "broadcast failed");
        }
    }
}

/// Check that the collector is reachable before watching.
///
/// Failure is a warning, not an error: the monitor still runs, broadcasts
/// just may be lost until the server comes up.
async fn probe_server(client: &reqwest::Client, server_url: &str) {
    match client.get(server_url).send().await {
        Ok(_) => info!(server_url, "server accessible"),
        Err(e) => warn!(
            server_url,
            error = %e,
            "cannot reach server; clipboard will be monitored but broadcasts may fail"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = BroadcastPayload {
            content: "hello".to_string(),
            timestamp: Some("2024-01-01T00:00:00Z".to_string()),
            user_id: Some("alice".to_string()),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["content"], "hello");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
        assert_eq!(json["user_id"], "alice");
    }

    #[tokio::test]
    async fn test_dispatch_does_not_block() {
        // Dispatch against an unreachable endpoint returns immediately;
        // the network attempt happens on a detached task.
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(100))
            .build()
            .unwrap();

        let start = std::time::Instant::now();
        dispatch(
            &client,
            "http://127.0.0.1:1/none",
            "alice",
            "content".to_string(),
        );
        assert!(start.elapsed() < std::time::Duration::from_millis(50));
    }
}
