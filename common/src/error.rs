use std::net::IpAddr;

use thiserror::Error;

/// Errors surfaced to whoever drives the engine.
///
/// Anything that goes wrong inside a running task is reported through the
/// task status instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown workload: {0}")]
    UnknownWorkload(String),
    #[error("task {0} is already running")]
    AlreadyRunning(String),
    #[error("no running task with id {0}")]
    NotFound(String),
    #[error("target {0} is outside the allowed networks")]
    TargetNotPermitted(IpAddr),
}
