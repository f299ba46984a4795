//! Socket probes and pre-flight checks

use crate::core::PortProber;
use crate::error::ProbeError;
use crate::network::ScanMode;
use crate::scanner::ScanRequest;
use crate::ScanError;
use async_trait::async_trait;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};

const UDP_RECV_BUFFER: usize = 1024;

/// Make sure a socket for `mode` can be created towards `target`.
///
/// Runs once before any probe is dispatched so that a missing address family
/// or an exhausted descriptor table aborts the scan instead of turning every
/// port into a closed one.
pub fn preflight(mode: ScanMode, target: IpAddr) -> crate::Result<()> {
    let domain = Domain::for_address(SocketAddr::new(target, 0));
    let (ty, protocol) = match mode {
        ScanMode::Tcp => (Type::STREAM, Protocol::TCP),
        ScanMode::Udp => (Type::DGRAM, Protocol::UDP),
    };

    Socket::new(domain, ty, Some(protocol))
        .map(drop)
        .map_err(|e| {
            ScanError::SocketError(format!(
                "cannot create {} socket for {}: {}",
                mode.name(),
                target,
                e
            ))
        })
}

/// TCP connect scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnectScanner;

impl TcpConnectScanner {
    /// Perform a TCP connect scan on a single port
    pub async fn scan_port(
        &self,
        target: IpAddr,
        port: u16,
        timeout: Duration,
    ) -> Result<(), ProbeError> {
        let addr = SocketAddr::new(target, port);

        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ProbeError::TimedOut),
        }
    }
}

#[async_trait]
impl PortProber for TcpConnectScanner {
    async fn probe(&self, request: &ScanRequest) -> Result<(), ProbeError> {
        self.scan_port(request.target, request.port, request.timeout)
            .await
    }

    fn name(&self) -> &str {
        "TCP Connect"
    }
}

/// UDP scanner for UDP port scanning
///
/// The socket is connected to the target so the kernel reports ICMP port
/// unreachable as `ConnectionRefused` and drops datagrams from other peers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpScanner;

impl UdpScanner {
    /// Send an empty datagram and wait up to `timeout` for any reply
    pub async fn scan_port(
        &self,
        target: IpAddr,
        port: u16,
        timeout: Duration,
    ) -> Result<(), ProbeError> {
        let socket = UdpSocket::bind(unspecified_for(target)).await?;
        socket.connect(SocketAddr::new(target, port)).await?;
        socket.send(&[]).await?;

        let mut buf = [0u8; UDP_RECV_BUFFER];
        match tokio::time::timeout(timeout, socket.recv(&mut buf)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            // Silence: open|filtered in reality, reported closed.
            Err(_) => Err(ProbeError::TimedOut),
        }
    }
}

#[async_trait]
impl PortProber for UdpScanner {
    async fn probe(&self, request: &ScanRequest) -> Result<(), ProbeError> {
        self.scan_port(request.target, request.port, request.timeout)
            .await
    }

    fn name(&self) -> &str {
        "UDP Probe"
    }
}

fn unspecified_for(target: IpAddr) -> SocketAddr {
    match target {
        IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}
