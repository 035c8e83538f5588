use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use strain_common::config::EngineConfig;
use strain_common::error::EngineError;
use strain_common::target::{TargetDescriptor, conventional_task_id};
use strain_core::Dispatcher;
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};

use super::RunArgs;

const STATUS_POLL: Duration = Duration::from_secs(1);

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg: EngineConfig = EngineConfig::default();
    cfg.allowed_networks.extend(args.allow);
    if let Some(rate) = args.rate {
        cfg.max_rate = rate;
    }

    let mut target: TargetDescriptor = TargetDescriptor::new(args.target);
    if let Some(port) = args.port {
        target = target.with_port(port);
    }
    if let Some(payload) = args.payload {
        target = target.with_payload(payload.into_bytes());
    }

    let task_id: String = args
        .task_id
        .unwrap_or_else(|| conventional_task_id(&target, &args.workload));
    let dispatcher: Arc<Dispatcher> = Arc::new(Dispatcher::new(cfg));

    let mut runner: JoinHandle<Result<(), EngineError>> = {
        let dispatcher = dispatcher.clone();
        let task_id = task_id.clone();
        let workload = args.workload.clone();
        let workers = args.workers;
        tokio::task::spawn_blocking(move || dispatcher.start(&task_id, &workload, target, workers))
    };

    let deadline = tokio::time::sleep(args.duration.map(Duration::from_secs).unwrap_or(Duration::MAX));
    tokio::pin!(deadline);
    let mut poll = tokio::time::interval(STATUS_POLL);

    loop {
        tokio::select! {
            joined = &mut runner => return finish(&task_id, joined),

            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, stopping {task_id}");
                break;
            }

            _ = &mut deadline, if args.duration.is_some() => {
                info!("Duration elapsed, stopping {task_id}");
                break;
            }

            _ = poll.tick() => {
                if dispatcher.is_running(&task_id) {
                    info!("{task_id}: {}", dispatcher.status(&task_id));
                }
            }
        }
    }

    if let Err(e) = dispatcher.stop(&task_id) {
        warn!("{e}");
    }

    finish(&task_id, runner.await)
}

fn finish(task_id: &str, joined: Result<Result<(), EngineError>, JoinError>) -> anyhow::Result<()> {
    joined
        .context("worker pool crashed")?
        .with_context(|| format!("could not run task {task_id}"))?;
    info!("Task {task_id} stopped and cleaned up");
    Ok(())
}
