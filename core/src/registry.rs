//! In-memory table of running tasks.
//!
//! Each entry holds the last status message reported by any of the task's
//! workers and the task's [`CancelSignal`]. The map lives behind one mutex that
//! is only held for the lookup or write itself.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use strain_common::error::EngineError;
use tracing::{debug, trace};

use crate::cancel::CancelSignal;

/// Returned by [`TaskRegistry::status`] for ids that are not running.
pub const NO_PROGRESS: &str = "no progress available";
pub const STARTING: &str = "Starting task...";

struct TaskState {
    status: String,
    cancel: CancelSignal,
}

#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<String, TaskState>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, task_id: &str) -> Result<CancelSignal, EngineError> {
        let mut tasks = self.tasks();
        if tasks.contains_key(task_id) {
            return Err(EngineError::AlreadyRunning(task_id.to_string()));
        }

        let cancel = CancelSignal::new();
        tasks.insert(
            task_id.to_string(),
            TaskState {
                status: STARTING.to_string(),
                cancel: cancel.clone(),
            },
        );
        Ok(cancel)
    }

    /// Overwrites the task's status. Unknown ids are ignored, since a worker
    /// may still report while its task is being torn down.
    pub fn report_status(&self, task_id: &str, message: impl Into<String>) {
        let message: String = message.into();
        let accepted: bool = match self.tasks().get_mut(task_id) {
            Some(state) => {
                state.status.clone_from(&message);
                true
            }
            None => false,
        };

        if accepted {
            debug!("Task {task_id}: {message}");
        } else {
            trace!("Dropped status for finished task {task_id}: {message}");
        }
    }

    pub fn signal_cancel(&self, task_id: &str) -> bool {
        let cancel: Option<CancelSignal> = self.tasks().get(task_id).map(|s| s.cancel.clone());
        match cancel {
            Some(cancel) => {
                cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn status(&self, task_id: &str) -> String {
        self.tasks()
            .get(task_id)
            .map(|state| state.status.clone())
            .unwrap_or_else(|| NO_PROGRESS.to_string())
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks().contains_key(task_id)
    }

    pub fn remove(&self, task_id: &str) {
        self.tasks().remove(task_id);
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<String, TaskState>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
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
