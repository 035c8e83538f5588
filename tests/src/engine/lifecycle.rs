#![cfg(test)]
use std::io::Read;
use std::net::{TcpListener, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use strain_common::error::EngineError;
use strain_common::target::{TargetDescriptor, conventional_task_id};
use strain_core::NO_PROGRESS;

use crate::utils::{LOCALHOST, dispatcher, spawn_start, wait_until};

const SETTLE: Duration = Duration::from_secs(5);

#[test]
fn status_is_sentinel_before_start_and_after_cleanup() {
    let dispatcher = dispatcher();
    assert_eq!(dispatcher.status("hb"), NO_PROGRESS);

    let handle = spawn_start(&dispatcher, "hb", "heartbeat", TargetDescriptor::new(LOCALHOST), 3);

    assert!(wait_until(SETTLE, || dispatcher.status("hb").starts_with("Heartbeat")));
    assert!(dispatcher.is_running("hb"));

    dispatcher.stop("hb").unwrap();
    assert_eq!(handle.join().unwrap(), Ok(()));

    assert!(!dispatcher.is_running("hb"));
    assert_eq!(dispatcher.status("hb"), NO_PROGRESS);
}

#[test]
fn duplicate_start_is_rejected_while_running() {
    let dispatcher = dispatcher();
    let handle = spawn_start(&dispatcher, "dup", "heartbeat", TargetDescriptor::new(LOCALHOST), 2);
    assert!(wait_until(SETTLE, || dispatcher.is_running("dup")));

    let second = dispatcher.start("dup", "heartbeat", TargetDescriptor::new(LOCALHOST), Some(2));
    assert_eq!(second, Err(EngineError::AlreadyRunning("dup".to_string())));

    dispatcher.stop("dup").unwrap();
    assert_eq!(handle.join().unwrap(), Ok(()));

    // The id is free again once the first run has been cleaned up.
    let rerun = spawn_start(&dispatcher, "dup", "heartbeat", TargetDescriptor::new(LOCALHOST), 1);
    assert!(wait_until(SETTLE, || dispatcher.is_running("dup")));
    dispatcher.stop("dup").unwrap();
    assert_eq!(rerun.join().unwrap(), Ok(()));
}

#[test]
fn stop_converges_within_one_pacing_interval() {
    let dispatcher = dispatcher();
    let sink = UdpSocket::bind((LOCALHOST, 0)).unwrap();
    let port: u16 = sink.local_addr().unwrap().port();

    let handle = spawn_start(&dispatcher, "pace", "udp", TargetDescriptor::new(LOCALHOST).with_port(port), 10);
    assert!(wait_until(SETTLE, || dispatcher.status("pace").starts_with("Sending")));

    let stopped_at: Instant = Instant::now();
    dispatcher.stop("pace").unwrap();
    assert_eq!(handle.join().unwrap(), Ok(()));

    let latency: Duration = stopped_at.elapsed();
    assert!(latency < Duration::from_secs(2), "stop took {latency:?}");
}

#[test]
fn missing_port_runs_full_lifecycle_without_traffic() {
    let dispatcher = dispatcher();

    let result = dispatcher.start("t1", "udp", TargetDescriptor::new(LOCALHOST), Some(5));

    assert_eq!(result, Ok(()));
    assert!(!dispatcher.is_running("t1"));
    assert_eq!(dispatcher.status("t1"), NO_PROGRESS);
}

#[test]
fn unknown_task_is_not_found() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.stop("nonexistent"),
        Err(EngineError::NotFound("nonexistent".to_string()))
    );
    assert_eq!(dispatcher.status("nonexistent"), NO_PROGRESS);
}

#[test]
fn udp_workload_end_to_end() {
    let dispatcher = dispatcher();
    let sink = UdpSocket::bind((LOCALHOST, 0)).unwrap();
    sink.set_read_timeout(Some(SETTLE)).unwrap();
    let port: u16 = sink.local_addr().unwrap().port();

    let target = TargetDescriptor::new(LOCALHOST).with_port(port);
    let task_id: String = conventional_task_id(&target, "udp");
    assert_eq!(task_id, "127.0.0.1-udp");

    let handle = spawn_start(&dispatcher, &task_id, "udp", target, 4);

    assert!(wait_until(SETTLE, || {
        dispatcher.status(&task_id).starts_with("Sending UDP datagrams")
    }));

    let mut buf = [0u8; 128];
    let received: usize = sink.recv(&mut buf).unwrap();
    assert_eq!(received, 64);

    dispatcher.stop(&task_id).unwrap();
    assert_eq!(handle.join().unwrap(), Ok(()));

    assert!(wait_until(SETTLE, || dispatcher.status(&task_id) == NO_PROGRESS));
    assert_eq!(
        dispatcher.stop(&task_id),
        Err(EngineError::NotFound(task_id.clone()))
    );
}

#[test]
fn tcp_connect_delivers_payload() {
    let dispatcher = dispatcher();
    let listener = TcpListener::bind((LOCALHOST, 0)).unwrap();
    let port: u16 = listener.local_addr().unwrap().port();

    let reader = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut body = String::new();
        stream.read_to_string(&mut body).unwrap();
        body
    });

    let target = TargetDescriptor::new(LOCALHOST)
        .with_port(port)
        .with_payload(b"ping\n".to_vec());
    let handle = spawn_start(&dispatcher, "tcp", "tcp_connect", target, 1);

    assert_eq!(reader.join().unwrap(), "ping\n");
    assert!(wait_until(SETTLE, || dispatcher.status("tcp").starts_with("Connecting")));

    dispatcher.stop("tcp").unwrap();
    assert_eq!(handle.join().unwrap(), Ok(()));
}
