use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use tracing::debug;

use super::{WorkerContext, Workload};

/// Completes a real handshake per unit, writes the target payload if one was
/// given, then closes. The connect timeout bounds how long a stop can wait.
pub struct TcpConnect {
    interval: Duration,
    connect_timeout: Duration,
}

impl TcpConnect {
    pub fn new(interval: Duration, connect_timeout: Duration) -> Self {
        Self {
            interval,
            connect_timeout,
        }
    }
}

impl Workload for TcpConnect {
    fn name(&self) -> &'static str {
        "tcp_connect"
    }

    fn requires_port(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut WorkerContext) {
        let Some(dest) = ctx.target.socket_addr() else {
            return;
        };

        let mut connected: u64 = 0;
        let mut failed: u64 = 0;

        while !ctx.cancel.is_cancelled() {
            match TcpStream::connect_timeout(&dest, self.connect_timeout) {
                Ok(mut stream) => {
                    let written: std::io::Result<()> = match &ctx.target.payload {
                        Some(bytes) => stream.write_all(bytes),
                        None => Ok(()),
                    };
                    match written {
                        Ok(()) => connected += 1,
                        Err(e) => {
                            failed += 1;
                            debug!("Worker {} write to {dest} failed: {e}", ctx.worker);
                        }
                    }
                    let _ = stream.shutdown(Shutdown::Both);
                }
                Err(e) => {
                    failed += 1;
                    debug!("Worker {} connect to {dest} failed: {e}", ctx.worker);
                }
            }

            ctx.status.report(|| {
                format!("Connecting to {dest}: {connected} connections, {failed} failed")
            });

            if ctx.cancel.wait_timeout(self.interval) {
                break;
            }
        }
    }
}
