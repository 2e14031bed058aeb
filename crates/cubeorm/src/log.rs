//! In-memory execution trace.
//!
//! Each entry is `[<UTC time>] <message>\n\t`. The buffer is drained (read and
//! cleared) in one step. Every entry is also emitted as a `tracing` event on
//! the `cubeorm.sql` target so a subscriber can print it.

use chrono::Utc;
use std::sync::{Mutex, PoisonError};

/// Append-only, drainable log buffer.
#[derive(Debug, Default)]
pub struct LogSink {
    buf: Mutex<String>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp `message` and append it. Empty messages are ignored.
    pub fn append(&self, message: &str) {
        if message.is_empty() {
            return;
        }
        let stamp = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT");
        tracing::info!(target: "cubeorm.sql", "{message}");
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        buf.push_str(&format!("[{stamp}] {message}\n\t"));
    }

    /// Return everything appended since the last drain and clear the buffer.
    pub fn drain(&self) -> String {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *buf)
    }
}
