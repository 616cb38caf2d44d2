//! Shelfmark RPC Server: JSON-RPC over stdin/stdout for the desktop shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmarks.add", "params":{"book":{...}}}
//! Response: {"id":1, "result":...} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use shelfmark::app::App;
use shelfmark::rpc_handler::handle_method;
use shelfmark::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Simple rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let data_dir = std::env::var_os("SHELFMARK_DATA_DIR").map(PathBuf::from);

    let settings_path = data_dir.as_ref().map(|dir| dir.join("settings.json"));
    let level = SettingsEngine::new(settings_path)
        .load()
        .map(|settings| settings.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&level);

    let app = match App::new(data_dir.as_deref()) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            error!(error = %e, "failed to initialize shelfmark");
            std::process::exit(1);
        }
    };

    // Single writer task so concurrent responses never interleave within a line.
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = io::stdout();
        while let Some(message) = rx.recv().await {
            let line = format!("{}\n", message);
            if stdout.write_all(line.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let _ = tx.send(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    info!("rpc server ready");

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = tx.send(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            warn!("rate limit exceeded");
            let _ = tx.send(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(Value::as_str).unwrap_or("").to_string();
        let params = req.get("params").cloned().unwrap_or_else(|| json!({}));

        let app = app.clone();
        let tx = tx.clone();
        let is_lookup = method.starts_with("catalog.");
        let task = async move {
            debug!(method = %method, "dispatch");
            let response = match handle_method(&app, &method, &params).await {
                Ok(val) => json!({"id": id, "result": val}),
                Err(err) => {
                    debug!(method = %method, error = %err, "method failed");
                    json!({"id": id, "error": err})
                }
            };
            let _ = tx.send(response);
        };

        // Catalog lookups run concurrently; every other method completes in arrival order.
        if is_lookup {
            tokio::spawn(task);
        } else {
            task.await;
        }
    }

    info!("stdin closed, shutting down");
    drop(tx);
    let _ = writer.await;
}
