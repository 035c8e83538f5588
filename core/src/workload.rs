//! The unified interface every traffic workload implements.
//!
//! A workload is a "run until cancelled" loop. The [`Dispatcher`](crate::Dispatcher)
//! runs one copy per worker thread, hands each a [`WorkerContext`], and owns
//! everything around the loop: parameter checks, panic isolation, and cleanup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use strain_common::config::EngineConfig;
use strain_common::error::EngineError;
use strain_common::target::TargetDescriptor;

use crate::cancel::CancelSignal;
use crate::report::StatusReporter;

mod heartbeat;
mod tcp;
mod udp;

pub use heartbeat::Heartbeat;
pub use tcp::TcpConnect;
pub use udp::UdpDatagrams;

pub trait Workload: Send + Sync {
    fn name(&self) -> &'static str;

    /// Workers refuse to run without a target port when this is `true`.
    fn requires_port(&self) -> bool {
        false
    }

    /// Emits traffic until `ctx.cancel` is set or the workload gives up.
    fn run(&self, ctx: &mut WorkerContext);
}

pub struct WorkerContext {
    pub task_id: String,
    pub worker: usize,
    pub target: Arc<TargetDescriptor>,
    pub cancel: CancelSignal,
    pub status: StatusReporter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Heartbeat,
    Udp,
    TcpConnect,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 3] = [Self::Heartbeat, Self::Udp, Self::TcpConnect];

    pub fn name(self) -> &'static str {
        match self {
            Self::Heartbeat => "heartbeat",
            Self::Udp => "udp",
            Self::TcpConnect => "tcp_connect",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Heartbeat => "Runs the task lifecycle without sending anything",
            Self::Udp => "Paced UDP datagrams from an ordinary socket (needs a port)",
            Self::TcpConnect => "Paced TCP connect and close cycles (needs a port)",
        }
    }

    pub fn build(self, cfg: &EngineConfig) -> Arc<dyn Workload> {
        match self {
            Self::Heartbeat => Arc::new(Heartbeat::new(cfg.tick_interval)),
            Self::Udp => Arc::new(UdpDatagrams::new(cfg.unit_interval(), cfg.payload_len)),
            Self::TcpConnect => Arc::new(TcpConnect::new(cfg.unit_interval(), cfg.connect_timeout)),
        }
    }
}

impl FromStr for WorkloadKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| EngineError::UnknownWorkload(s.to_string()))
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
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
