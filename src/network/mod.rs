//! Network module for probe modes and socket handling

pub mod socket;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available scan modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// TCP connect scan (full handshake)
    #[default]
    Tcp,
    /// UDP probe (empty datagram, wait for any reply)
    Udp,
}

impl ScanMode {
    /// Get the name of the scan mode
    pub fn name(&self) -> &'static str {
        match self {
            ScanMode::Tcp => "TCP",
            ScanMode::Udp => "UDP",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Tcp => "tcp",
            ScanMode::Udp => "udp",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tcp" | "connect" => Ok(ScanMode::Tcp),
            "udp" => Ok(ScanMode::Udp),
            other => Err(format!("unknown scan mode '{}' (expected tcp or udp)", other)),
        }
    }
}

/// Port state enumeration
///
/// A UDP port that stayed silent is `Closed` here even though it may be
/// filtered or simply ignoring empty datagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    Closed,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Open => write!(f, "open"),
            PortState::Closed => write!(f, "closed"),
        }
    }
}
