// Probe trait seam between the worker pool and the sockets

use crate::error::ProbeError;
use crate::network::socket::{self, TcpConnectScanner, UdpScanner};
use crate::network::ScanMode;
use crate::scanner::ScanRequest;
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;

/// A single-port prober.
///
/// `Ok(())` means the port answered and is open. Any `Err` classifies the port
/// as closed; the error only says why.
#[async_trait]
pub trait PortProber: Send + Sync {
    async fn probe(&self, request: &ScanRequest) -> Result<(), ProbeError>;

    fn name(&self) -> &str;

    /// Checked once before any probe is dispatched; an error aborts the scan.
    fn preflight(&self, mode: ScanMode, target: IpAddr) -> crate::Result<()> {
        socket::preflight(mode, target)
    }
}

/// Creates the prober matching a scan mode
pub struct ProberFactory;

impl ProberFactory {
    pub fn for_mode(mode: ScanMode) -> Arc<dyn PortProber> {
        match mode {
            ScanMode::Tcp => Arc::new(TcpConnectScanner),
            ScanMode::Udp => Arc::new(UdpScanner),
        }
    }
}
