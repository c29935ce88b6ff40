//! Collector server.
//!
//! A single HTTP service that accepts clipboard broadcasts tagged by user
//! id, appends them to the two durable logs, and exposes read endpoints
//! for statistics and per-user history. The log store is behind one
//! process-wide lock; every handler that touches the counter or the files
//! holds it for the full read-modify-write, so concurrent requests can
//! never interleave two load-modify-store cycles on the JSON document.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::broadcast::{BroadcastAck, BroadcastPayload};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::{LogStore, JSON_LOG_FILE_NAME, LOG_FILE_NAME};

/// Longest content preview written to the server log.
const MAX_CONTENT_DISPLAY: usize = 100;

/// Shared server context: the lock, counter, and file paths, passed to
/// every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<Mutex<LogStore>>,
}

impl AppState {
    /// Wrap a log store for use as axum state.
    #[must_use]
    pub fn new(store: LogStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// Build the collector router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/stats", get(stats))
        .route("/logs/{user_id}", get(user_logs))
        .route("/clear-logs", post(clear_logs))
        .route("/{user_id}", post(receive_broadcast))
        .with_state(state)
}

/// Run the collector server until the process is stopped.
///
/// # Errors
///
/// Returns an error when the log directory cannot be created or the listen
/// address cannot be bound.
pub async fn run(config: &Config) -> Result<()> {
    let ip = config.listen_ip().map_err(|e| Error::ConfigValidation {
        message: format!("invalid listen host '{}': {e}", config.server.host),
    })?;
    let addr = SocketAddr::new(ip, config.server.port);

    std::fs::create_dir_all(&config.server.log_dir).map_err(|source| Error::DirectoryCreate {
        path: config.server.log_dir.clone(),
        source,
    })?;

    let state = AppState::new(LogStore::new(&config.server.log_dir));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!(
        %addr,
        log_dir = %config.server.log_dir.display(),
        "collector server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn receive_broadcast(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: std::result::Result<Json<BroadcastPayload>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        // Missing or unparsable body is a client error and is not logged
        // as a broadcast.
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No JSON data received" })),
        )
            .into_response();
    };

    let record = state.store.lock().await.append(&user_id, &payload);

    let preview: String = record.content.chars().take(MAX_CONTENT_DISPLAY).collect();
    info!(
        user_id,
        content_length = record.content_length,
        preview,
        "clipboard broadcast received"
    );

    Json(BroadcastAck {
        status: "success".to_string(),
        message: "Clipboard data received and logged".to_string(),
        user_id: record.user_id,
        content_length: record.content_length,
        broadcast_number: record.sequence,
    })
    .into_response()
}

async fn stats(State(state): State<AppState>) -> Response {
    Json(state.store.lock().await.stats()).into_response()
}

async fn user_logs(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    match state.store.lock().await.user_logs(&user_id) {
        Ok(logs) => Json(logs).into_response(),
        Err(e) => {
            error!(user_id, error = %e, "error retrieving user logs");
            internal_error()
        }
    }
}

async fn clear_logs(State(state): State<AppState>) -> Response {
    match state.store.lock().await.clear() {
        Ok(files_cleared) => Json(json!({
            "status": "success",
            "message": "Log files cleared",
            "files_cleared": files_cleared,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "error clearing logs");
            internal_error()
        }
    }
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let stats = state.store.lock().await.stats();
    Html(format!(
        r"<html>
<head><title>spill: clipboard broadcast server</title></head>
<body>
    <h1>Spill</h1>
    <h2>Status: Running</h2>

    <h3>Statistics:</h3>
    <ul>
        <li>Total Broadcasts Received: <strong>{total}</strong></li>
        <li>Log File Size: <strong>{log_size} bytes</strong></li>
        <li>JSON Log Size: <strong>{json_size} bytes</strong></li>
        <li>Server Started: <strong>{uptime}</strong></li>
    </ul>

    <h3>Endpoints:</h3>
    <ul>
        <li><code>POST /&lt;user_id&gt;</code> - Receive clipboard broadcasts</li>
        <li><code>GET /stats</code> - Get server statistics (JSON)</li>
        <li><code>GET /logs/&lt;user_id&gt;</code> - Get recent logs for user (JSON)</li>
        <li><code>POST /clear-logs</code> - Clear both log files</li>
    </ul>

    <h3>Log Files:</h3>
    <ul>
        <li><strong>{log_file}</strong> - Human readable log</li>
        <li><strong>{json_file}</strong> - Structured JSON log</li>
    </ul>

    <p><em>Refresh this page to see updated statistics.</em></p>
</body>
</html>",
        total = stats.total_broadcasts,
        log_size = stats.log_file_size,
        json_size = stats.json_log_size,
        uptime = stats.uptime,
        log_file = LOG_FILE_NAME,
        json_file = JSON_LOG_FILE_NAME,
    ))
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}
