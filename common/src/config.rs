use std::time::Duration;

use pnet::ipnetwork::IpNetwork;

pub const DEFAULT_CONCURRENCY: usize = 10;

pub struct EngineConfig {
    /// Workers launched per task when the caller does not ask for a number.
    pub concurrency: usize,
    /// Minimum gap between two registry writes from the same worker.
    ///
    /// The first report of every worker is always written.
    pub status_interval: Duration,
    /// Upper bound on units emitted per second, per worker.
    pub max_rate: u32,
    /// Pacing of workloads that emit no traffic.
    pub tick_interval: Duration,
    pub connect_timeout: Duration,
    /// Size of the random payload used when the target carries none.
    pub payload_len: usize,
    /// Networks a task is allowed to address. Anything else is refused at start.
    pub allowed_networks: Vec<IpNetwork>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            status_interval: Duration::from_millis(250),
            max_rate: 50,
            tick_interval: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(1),
            payload_len: 64,
            allowed_networks: loopback_networks(),
        }
    }
}

impl EngineConfig {
    pub fn permits(&self, addr: std::net::IpAddr) -> bool {
        self.allowed_networks.iter().any(|net| net.contains(addr))
    }

    /// Time between two units at `max_rate`. A zero rate is treated as one per second.
    pub fn unit_interval(&self) -> Duration {
        Duration::from_secs(1) / self.max_rate.max(1)
    }
}

fn loopback_networks() -> Vec<IpNetwork> {
    ["127.0.0.0/8", "::1/128"]
        .iter()
        .filter_map(|cidr| cidr.parse().ok())
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
