#![cfg(test)]
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use strain_common::target::TargetDescriptor;
use strain_core::{NO_PROGRESS, WorkerContext, Workload};

use crate::utils::{LOCALHOST, dispatcher, wait_until};

const WORKERS: usize = 10;

/// Worker 0 blows up on its first unit, everyone else keeps counting.
struct FaultyFirstWorker {
    units: Arc<Vec<AtomicU64>>,
}

impl Workload for FaultyFirstWorker {
    fn name(&self) -> &'static str {
        "faulty"
    }

    fn run(&self, ctx: &mut WorkerContext) {
        if ctx.worker == 0 {
            panic!("send buffer exhausted");
        }
        while !ctx.cancel.is_cancelled() {
            let done: u64 = self.units[ctx.worker].fetch_add(1, Ordering::Relaxed) + 1;
            let worker: usize = ctx.worker;
            ctx.status.report(|| format!("worker {worker}: {done} units"));

            if ctx.cancel.wait_timeout(Duration::from_millis(5)) {
                break;
            }
        }
    }
}

fn snapshot(units: &[AtomicU64]) -> Vec<u64> {
    units.iter().map(|u| u.load(Ordering::Relaxed)).collect()
}

#[test]
fn one_failing_worker_does_not_stop_siblings() {
    let dispatcher = dispatcher();
    let units: Arc<Vec<AtomicU64>> = Arc::new((0..WORKERS).map(|_| AtomicU64::new(0)).collect());
    let workload = Arc::new(FaultyFirstWorker { units: units.clone() });

    let handle = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || {
            dispatcher.run("iso", workload, TargetDescriptor::new(LOCALHOST), Some(WORKERS))
        })
    };

    assert!(wait_until(Duration::from_secs(5), || {
        snapshot(&units)[1..].iter().all(|&n| n > 0)
    }));

    let before: Vec<u64> = snapshot(&units);
    thread::sleep(Duration::from_millis(100));
    let after: Vec<u64> = snapshot(&units);

    assert_eq!(after[0], 0);
    for worker in 1..WORKERS {
        assert!(
            after[worker] > before[worker],
            "worker {worker} stalled at {}",
            after[worker]
        );
    }

    dispatcher.stop("iso").unwrap();
    assert_eq!(handle.join().unwrap(), Ok(()));
    assert_eq!(dispatcher.status("iso"), NO_PROGRESS);
}
