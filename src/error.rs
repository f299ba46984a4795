//! Error handling for the portprobe scanner
//!
//! Two layers of errors live here. [`ScanError`] is fatal: it aborts the whole
//! scan before or instead of dispatching probes. [`ProbeError`] belongs to a
//! single port and never escapes the worker pool; it is recorded next to the
//! port's result so callers can tell "closed" apart from "probe broke".

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Main error type for scanning operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Port range error: {0}")]
    PortRangeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Socket error: {0}")]
    SocketError(String),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("Worker pool is shut down")]
    PoolClosed,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Why a single probe did not report the port open.
///
/// Every variant still classifies the port as closed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeError {
    #[error("connection refused")]
    Refused,

    #[error("timed out")]
    TimedOut,

    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("probe aborted: {0}")]
    Aborted(String),
}

impl ProbeError {
    /// Timeouts are the expected outcome for filtered ports and silent UDP services.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::TimedOut)
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => ProbeError::Refused,
            io::ErrorKind::TimedOut => ProbeError::TimedOut,
            io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::AddrNotAvailable => ProbeError::Unreachable(err.to_string()),
            _ => ProbeError::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_probe_errors() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(ProbeError::from(refused), ProbeError::Refused);

        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert!(ProbeError::from(timed_out).is_timeout());

        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(ProbeError::from(reset), ProbeError::Io(_)));
    }

    #[test]
    fn scan_error_messages() {
        let err = ScanError::InvalidTarget("nope.invalid".to_string());
        assert_eq!(err.to_string(), "Invalid target: nope.invalid");
        assert_eq!(ScanError::PoolClosed.to_string(), "Worker pool is shut down");
    }
}
