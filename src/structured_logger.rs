//! Structured JSONL logger for diary flow events.
//!
//! Each line carries a monotonic sequence number, a microsecond timestamp,
//! the diary session ID and the emitting component, so a session can be
//! reconstructed from its event log.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::errors::FlowError;
use crate::state_machine::{FlowChange, FlowEvent};

/// Structured JSONL logger for debugging and event reconstruction.
pub struct StructuredLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number (unique across the logger's lifetime)
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds
    pub ts: String,
    pub session_id: String,
    /// Component that emitted the log
    pub component: String,
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a logger appending to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs directory cannot be created or the log
    /// file cannot be opened.
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event as a single JSON line. Write failures are dropped.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs an event received by the flow state machine.
    pub fn log_flow_event(&self, apply_seq: u64, event: &FlowEvent) {
        self.log(
            "Flow",
            serde_json::json!({
                "type": "FlowEvent",
                "apply_seq": apply_seq,
                "event": event
            }),
        );
    }

    /// Logs a change emitted by the flow state machine.
    pub fn log_flow_change(&self, apply_seq: u64, change: &FlowChange) {
        self.log(
            "Flow",
            serde_json::json!({
                "type": "FlowChange",
                "apply_seq": apply_seq,
                "change": change
            }),
        );
    }

    /// Logs an event the flow refused.
    pub fn log_rejection(&self, apply_seq: u64, error: &FlowError) {
        self.log(
            "Flow",
            serde_json::json!({
                "type": "Rejected",
                "apply_seq": apply_seq,
                "error": error.to_string()
            }),
        );
    }

    /// Logs a draft persistence operation and whether it succeeded.
    pub fn log_persistence(&self, operation: &str, success: bool) {
        self.log(
            "Draft",
            serde_json::json!({
                "type": "Persistence",
                "operation": operation,
                "success": success
            }),
        );
    }

    /// Logs the outcome of handing a finished diary to chat.
    pub fn log_handoff(&self, chat_session_id: &str, success: bool, error: Option<&str>) {
        self.log(
            "Handoff",
            serde_json::json!({
                "type": "ChatHandoff",
                "chat_session_id": chat_session_id,
                "success": success,
                "error": error
            }),
        );
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod tests;
