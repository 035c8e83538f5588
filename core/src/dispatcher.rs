//! Starts, runs and stops tasks.
//!
//! [`Dispatcher::start`] is synchronous: it registers the task, fans the
//! workload out over the requested number of worker threads, blocks until all
//! of them have joined, and removes the task on the way out. Callers that need
//! to keep going while a task runs call it from a thread or blocking task of
//! their own, and use [`Dispatcher::stop`] and [`Dispatcher::status`] from
//! elsewhere.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use strain_common::config::EngineConfig;
use strain_common::error::EngineError;
use strain_common::target::TargetDescriptor;
use tracing::{error, info, warn};

use crate::registry::TaskRegistry;
use crate::report::StatusReporter;
use crate::workload::{WorkerContext, Workload, WorkloadKind};

pub struct Dispatcher {
    registry: Arc<TaskRegistry>,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: Arc::new(TaskRegistry::new()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves `kind` by name and runs it. See [`Dispatcher::run`].
    pub fn start(
        &self,
        task_id: &str,
        kind: &str,
        target: TargetDescriptor,
        concurrency: Option<usize>,
    ) -> Result<(), EngineError> {
        let kind: WorkloadKind = kind.parse()?;
        self.run(task_id, kind.build(&self.config), target, concurrency)
    }

    /// Runs `workload` on `concurrency` workers (the configured default when
    /// `None`, at least one) and returns once every worker has joined.
    ///
    /// Only misuse is returned as an error. Failures inside the workers end up
    /// in the task status.
    pub fn run(
        &self,
        task_id: &str,
        workload: Arc<dyn Workload>,
        target: TargetDescriptor,
        concurrency: Option<usize>,
    ) -> Result<(), EngineError> {
        if !self.config.permits(target.addr) {
            return Err(EngineError::TargetNotPermitted(target.addr));
        }

        let cancel = self.registry.create(task_id)?;
        let _cleanup = RemoveOnExit {
            registry: &self.registry,
            task_id,
        };

        let workers: usize = concurrency.unwrap_or(self.config.concurrency).max(1);
        let target: Arc<TargetDescriptor> = Arc::new(target);
        info!(
            "Task {task_id} started: {} on {target} with {workers} workers",
            workload.name()
        );

        thread::scope(|scope| {
            for worker in 0..workers {
                let ctx = WorkerContext {
                    task_id: task_id.to_string(),
                    worker,
                    target: target.clone(),
                    cancel: cancel.clone(),
                    status: StatusReporter::new(
                        self.registry.clone(),
                        task_id,
                        self.config.status_interval,
                    ),
                };
                let shared: &dyn Workload = workload.as_ref();

                let spawned = thread::Builder::new()
                    .name(format!("{task_id}#{worker}"))
                    .spawn_scoped(scope, move || run_worker(shared, ctx));

                if let Err(e) = spawned {
                    error!("Task {task_id}: could not spawn worker {worker}: {e}");
                    self.registry
                        .report_status(task_id, format!("Could not spawn worker {worker}: {e}"));
                }
            }
        });

        info!("Task {task_id} finished");
        Ok(())
    }

    /// Asks every worker of `task_id` to stop. Does not wait for them.
    pub fn stop(&self, task_id: &str) -> Result<(), EngineError> {
        if self.registry.signal_cancel(task_id) {
            info!("Task {task_id}: stop requested");
            Ok(())
        } else {
            Err(EngineError::NotFound(task_id.to_string()))
        }
    }

    pub fn status(&self, task_id: &str) -> String {
        self.registry.status(task_id)
    }

    pub fn is_running(&self, task_id: &str) -> bool {
        self.registry.contains(task_id)
    }
}

struct RemoveOnExit<'a> {
    registry: &'a TaskRegistry,
    task_id: &'a str,
}

impl Drop for RemoveOnExit<'_> {
    fn drop(&mut self) {
        self.registry.remove(self.task_id);
    }
}

fn run_worker(workload: &dyn Workload, mut ctx: WorkerContext) {
    if workload.requires_port() && ctx.target.port.is_none() {
        ctx.status.force(format!(
            "Missing parameter: port is required for {}",
            workload.name()
        ));
        return;
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| workload.run(&mut ctx)));

    if let Err(payload) = outcome {
        let reason: String = panic_reason(payload.as_ref());
        warn!("Task {}: worker {} failed: {reason}", ctx.task_id, ctx.worker);
        ctx.status
            .force(format!("Error in worker {}: {reason}", ctx.worker));
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
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
