use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use super::{WorkerContext, Workload};

/// One datagram per unit, sent from an ordinary bound socket.
pub struct UdpDatagrams {
    interval: Duration,
    payload_len: usize,
}

impl UdpDatagrams {
    pub fn new(interval: Duration, payload_len: usize) -> Self {
        Self {
            interval,
            payload_len,
        }
    }
}

impl Workload for UdpDatagrams {
    fn name(&self) -> &'static str {
        "udp"
    }

    fn requires_port(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut WorkerContext) {
        let Some(dest) = ctx.target.socket_addr() else {
            return;
        };

        let socket: UdpSocket = match UdpSocket::bind(unspecified_for(&dest)) {
            Ok(socket) => socket,
            Err(e) => {
                ctx.status.force(format!("Could not open UDP socket: {e}"));
                return;
            }
        };

        let payload: Vec<u8> = match &ctx.target.payload {
            Some(bytes) => bytes.clone(),
            None => random_payload(self.payload_len),
        };

        let mut sent: u64 = 0;
        let mut failed: u64 = 0;

        while !ctx.cancel.is_cancelled() {
            match socket.send_to(&payload, dest) {
                Ok(_) => sent += 1,
                Err(e) => {
                    failed += 1;
                    debug!("Worker {} send to {dest} failed: {e}", ctx.worker);
                }
            }

            ctx.status.report(|| {
                format!("Sending UDP datagrams to {dest}: {sent} sent, {failed} failed")
            });

            if ctx.cancel.wait_timeout(self.interval) {
                break;
            }
        }
    }
}

fn unspecified_for(dest: &SocketAddr) -> SocketAddr {
    match dest {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

fn random_payload(len: usize) -> Vec<u8> {
    let mut payload: Vec<u8> = vec![0u8; len];
    rand::rng().fill(payload.as_mut_slice());
    payload
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
