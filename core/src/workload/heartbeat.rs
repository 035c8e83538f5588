use std::time::Duration;

use super::{WorkerContext, Workload};

/// Sends nothing. Ticks at a fixed interval so a task can be started, watched,
/// and stopped without touching the network.
pub struct Heartbeat {
    tick_interval: Duration,
}

impl Heartbeat {
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }
}

impl Workload for Heartbeat {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    fn run(&self, ctx: &mut WorkerContext) {
        let mut ticks: u64 = 0;
        while !ctx.cancel.is_cancelled() {
            ticks += 1;
            let worker: usize = ctx.worker;
            ctx.status
                .report(|| format!("Heartbeat worker {worker}: {ticks} ticks"));

            if ctx.cancel.wait_timeout(self.tick_interval) {
                break;
            }
        }
    }
}
