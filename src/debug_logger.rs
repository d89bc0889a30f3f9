// Decision log for asynchronous JSONL logging of move requests
//
// Each decision is written as one JSON line by a spawned task so that file I/O
// never delays a response. The replay tool reads these files back.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::moves::Move;
use crate::types::AgentId;

/// Represents a single decision log entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DecisionLogEntry {
    /// Position of the request in the server's lifetime, starting at 1
    pub sequence: u64,
    pub agent_id: AgentId,
    /// Raw request line exactly as received
    pub request: String,
    pub chosen_move: String,
    pub timestamp: String,
}

/// Shared decision logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new decision logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create decision log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a decision asynchronously (fire-and-forget).
    /// Outside a tokio runtime the entry is dropped with an error.
    pub fn log_decision(&self, sequence: u64, agent_id: AgentId, request: &str, chosen_move: Move) {
        if !self.enabled {
            return;
        }

        let entry = DecisionLogEntry {
            sequence,
            agent_id,
            request: request.to_string(),
            chosen_move: chosen_move.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Dropping decision log entry #{}: {}", sequence, e);
                return;
            }
        };
        let file_handle = self.file.clone();

        runtime.spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Writes one entry and waits for it; used by tests and shutdown paths
    pub async fn write_now(&self, entry: DecisionLogEntry) {
        if self.enabled {
            Self::write_entry(self.file.clone(), entry).await;
        }
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DecisionLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write decision log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush decision log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize decision log entry: {}", e);
                }
            }
        }
    }
}
