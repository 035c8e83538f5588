//! # Task Target Model
//!
//! Describes what a task is pointed at: an address, an optional port, and an
//! optional payload. A descriptor is built once when the task starts and is
//! shared read-only between all of its workers.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub addr: IpAddr,
    pub port: Option<u16>,
    pub payload: Option<Vec<u8>>,
}

impl TargetDescriptor {
    pub fn new(addr: IpAddr) -> Self {
        Self {
            addr,
            port: None,
            payload: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.port.map(|port| SocketAddr::new(self.addr, port))
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.socket_addr() {
            Some(sock) => write!(f, "{sock}"),
            None => write!(f, "{}", self.addr),
        }
    }
}

/// Builds the `<target>-<kind>` id used when the caller does not supply one.
pub fn conventional_task_id(target: &TargetDescriptor, kind: &str) -> String {
    format!("{}-{kind}", target.addr)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
