//! Scanner module containing the scan dispatcher and its worker pool

pub mod engine;
pub mod pool;

use crate::error::ProbeError;
use crate::network::{PortState, ScanMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub use engine::{scan, ScanEngine};
pub use pool::WorkerPool;

/// One probe to run: built once per port and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    pub target: IpAddr,
    pub port: u16,
    pub timeout: Duration,
    pub mode: ScanMode,
}

impl ScanRequest {
    pub fn new(target: IpAddr, port: u16, timeout: Duration, mode: ScanMode) -> Self {
        Self {
            target,
            port,
            timeout,
            mode,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.target, self.port)
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub port: u16,
    pub open: bool,
    /// Why the port was not found open, if the probe said anything.
    pub error: Option<ProbeError>,
    pub response_time: Duration,
}

impl ScanResult {
    pub fn open(port: u16, response_time: Duration) -> Self {
        Self {
            port,
            open: true,
            error: None,
            response_time,
        }
    }

    pub fn closed(port: u16, error: ProbeError, response_time: Duration) -> Self {
        Self {
            port,
            open: false,
            error: Some(error),
            response_time,
        }
    }

    pub fn state(&self) -> PortState {
        if self.open {
            PortState::Open
        } else {
            PortState::Closed
        }
    }
}

/// Scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Probes that ran to completion
    pub probes: u64,
    pub open: u64,
    pub closed: u64,
    /// Closed ports whose probe hit the timeout
    pub timeouts: u64,
    /// Closed ports whose probe failed with anything but a timeout or refusal
    pub errors: u64,
}

impl ScanStats {
    pub fn record(&mut self, result: &ScanResult) {
        self.probes += 1;
        if result.open {
            self.open += 1;
            return;
        }
        self.closed += 1;
        match &result.error {
            Some(ProbeError::TimedOut) => self.timeouts += 1,
            Some(ProbeError::Refused) | None => {}
            Some(_) => self.errors += 1,
        }
    }
}

/// Complete scan report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Target as the caller wrote it
    pub target: String,

    /// Address the target resolved to
    pub address: IpAddr,

    pub mode: ScanMode,

    /// Open ports, in the order they were discovered
    pub open_ports: Vec<u16>,

    /// Every probe result, in completion order
    pub results: Vec<ScanResult>,

    /// Total wall-clock duration
    pub duration: Duration,

    pub stats: ScanStats,
}

impl ScanReport {
    pub fn new(target: String, address: IpAddr, mode: ScanMode) -> Self {
        Self {
            target,
            address,
            mode,
            open_ports: Vec::new(),
            results: Vec::new(),
            duration: Duration::from_secs(0),
            stats: ScanStats::default(),
        }
    }

    /// Add a probe result to the report
    pub fn add_result(&mut self, result: ScanResult) {
        self.stats.record(&result);
        if result.open {
            self.open_ports.push(result.port);
        }
        self.results.push(result);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Open ports as an ordered set, independent of discovery order
    pub fn open_set(&self) -> BTreeSet<u16> {
        self.open_ports.iter().copied().collect()
    }

    pub fn total_ports(&self) -> usize {
        self.results.len()
    }

    /// Get scan rate in ports per second
    pub fn scan_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.total_ports() as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}
