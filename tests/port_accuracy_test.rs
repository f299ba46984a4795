//! Port accuracy tests against real loopback listeners
//!
//! Every open port has to be found and every port without a listener has to
//! come back closed, never as a scan failure.

use portprobe::{scan, ProbeError, ScanConfig, ScanEngine, ScanMode};
use std::collections::BTreeSet;
use std::net::{TcpListener, UdpSocket};
use std::time::{Duration, Instant};

/// Test server that opens multiple TCP ports
struct TestServer {
    _listeners: Vec<TcpListener>,
    ports: Vec<u16>,
}

impl TestServer {
    fn new(count: usize) -> std::io::Result<Self> {
        let mut listeners = Vec::new();
        let mut ports = Vec::new();

        for _ in 0..count {
            let listener = TcpListener::bind("127.0.0.1:0")?;
            ports.push(listener.local_addr()?.port());
            listeners.push(listener);
        }

        Ok(Self {
            _listeners: listeners,
            ports,
        })
    }
}

/// Ports that were just free: nothing listens on them any more.
fn free_tcp_ports(count: usize) -> Vec<u16> {
    let listeners: Vec<TcpListener> = (0..count)
        .map(|_| TcpListener::bind("127.0.0.1:0").unwrap())
        .collect();
    listeners
        .iter()
        .map(|l| l.local_addr().unwrap().port())
        .collect()
}

#[tokio::test]
async fn test_all_listening_ports_detected() {
    let server = TestServer::new(10).expect("bind test listeners");
    let config = ScanConfig::new().with_timeout(1000).with_concurrency(5);

    let report = scan("127.0.0.1", server.ports.clone(), config).await.unwrap();

    let expected: BTreeSet<u16> = server.ports.iter().copied().collect();
    assert_eq!(report.open_set(), expected);
    assert_eq!(report.stats.probes, 10);
}

#[tokio::test]
async fn test_refused_ports_are_closed_not_errors() {
    let server = TestServer::new(2).expect("bind test listeners");
    let closed = free_tcp_ports(3);

    let mut ports = server.ports.clone();
    ports.extend(&closed);
    let config = ScanConfig::new().with_timeout(1000).with_concurrency(10);

    let report = scan("127.0.0.1", ports, config).await.unwrap();

    let expected: BTreeSet<u16> = server.ports.iter().copied().collect();
    assert_eq!(report.open_set(), expected);
    for port in closed {
        let result = report.results.iter().find(|r| r.port == port).unwrap();
        assert!(!result.open, "port {} should be closed", port);
        assert_eq!(result.error, Some(ProbeError::Refused));
    }
}

#[tokio::test]
async fn test_hostname_target() {
    let server = TestServer::new(1).expect("bind test listener");
    let config = ScanConfig::new()
        .with_ports(server.ports.clone())
        .with_timeout(1000);

    let report = ScanEngine::new(config)
        .unwrap()
        .scan("localhost")
        .await
        .unwrap();
    assert!(report.address.is_loopback());
    assert_eq!(report.open_ports, server.ports);
}

#[tokio::test]
async fn test_unroutable_host_bounded_by_timeout() {
    let timeout = Duration::from_millis(300);
    let config = ScanConfig::new()
        .with_timeout(timeout.as_millis() as u64)
        .with_concurrency(2);

    // TEST-NET-1: probes are either dropped (timeout) or rejected at once.
    let start = Instant::now();
    let report = scan("192.0.2.1", [80, 443], config).await.unwrap();
    let elapsed = start.elapsed();

    assert!(report.open_ports.is_empty());
    assert_eq!(report.stats.closed, 2);
    assert!(
        elapsed < timeout + Duration::from_secs(1),
        "scan took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_udp_responder_is_open() {
    let responder = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = responder.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        while let Ok((_, peer)) = responder.recv_from(&mut buf).await {
            let _ = responder.send_to(b"ack", peer).await;
        }
    });

    let config = ScanConfig::new()
        .with_mode(ScanMode::Udp)
        .with_timeout(1000);
    let report = scan("127.0.0.1", [port], config).await.unwrap();

    assert_eq!(report.mode, ScanMode::Udp);
    assert_eq!(report.open_ports, vec![port]);
}

#[tokio::test]
async fn test_udp_without_responder_is_closed() {
    let timeout = Duration::from_millis(250);

    // One port bound but silent, one port with nothing bound at all.
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let silent_port = silent.local_addr().unwrap().port();
    let unbound_port = {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.local_addr().unwrap().port()
    };

    let config = ScanConfig::new()
        .with_mode(ScanMode::Udp)
        .with_timeout(timeout.as_millis() as u64)
        .with_concurrency(2);

    let start = Instant::now();
    let report = scan("127.0.0.1", [silent_port, unbound_port], config)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert!(report.open_ports.is_empty());
    assert_eq!(report.stats.closed, 2);
    let silent_result = report
        .results
        .iter()
        .find(|r| r.port == silent_port)
        .unwrap();
    assert_eq!(silent_result.error, Some(ProbeError::TimedOut));
    assert!(elapsed < timeout + Duration::from_secs(1));
    drop(silent);
}
