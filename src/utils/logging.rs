//! Activity logging
//!
//! Timestamped activity entries for the display surface, mirrored to the
//! `log` facade.

use chrono::{DateTime, Local};
use log::{error, info};
use tokio::sync::mpsc;

/// Severity flag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Error,
}

/// One activity entry. Ephemeral: exists only for display, never persisted.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    fn new(message: String, severity: Severity) -> Self {
        Self {
            timestamp: Local::now(),
            message,
            severity,
        }
    }

    /// Renders the entry the way the log window shows it.
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Records server activity.
///
/// Every entry goes to the `log` facade; when a display subscriber is
/// attached, entries are also pushed over its channel. Cloning shares the
/// subscriber.
#[derive(Clone, Default)]
pub struct ActivityLog {
    subscriber: Option<mpsc::UnboundedSender<LogEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self { subscriber: None }
    }

    /// Creates a log whose entries are also delivered to the returned
    /// receiver, for a display surface or a test observer.
    pub fn with_subscriber() -> (Self, mpsc::UnboundedReceiver<LogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                subscriber: Some(tx),
            },
            rx,
        )
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(message.into(), Severity::Normal);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(message.into(), Severity::Error);
    }

    fn record(&self, message: String, severity: Severity) {
        match severity {
            Severity::Normal => info!("{}", message),
            Severity::Error => error!("{}", message),
        }

        if let Some(tx) = &self.subscriber {
            // A detached display surface is not an error.
            let _ = tx.send(LogEntry::new(message, severity));
        }
    }
}
