use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::registry::TaskRegistry;

/// Per-worker throttle in front of [`TaskRegistry::report_status`].
///
/// Fast loops call [`StatusReporter::report`] on every unit; only one write per
/// `interval` reaches the registry. The first call always goes through.
pub struct StatusReporter {
    registry: Arc<TaskRegistry>,
    task_id: String,
    interval: Duration,
    last_write: Option<Instant>,
}

impl StatusReporter {
    pub fn new(registry: Arc<TaskRegistry>, task_id: &str, interval: Duration) -> Self {
        Self {
            registry,
            task_id: task_id.to_string(),
            interval,
            last_write: None,
        }
    }

    /// Writes the message built by `message` if the interval has elapsed.
    ///
    /// Returns whether a write happened.
    pub fn report<F>(&mut self, message: F) -> bool
    where
        F: FnOnce() -> String,
    {
        let due: bool = self
            .last_write
            .is_none_or(|last| last.elapsed() >= self.interval);
        if due {
            self.force(message());
        }
        due
    }

    /// Writes unconditionally. Used for final and error messages.
    pub fn force(&mut self, message: impl Into<String>) {
        self.registry.report_status(&self.task_id, message);
        self.last_write = Some(Instant::now());
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
