//! portprobe - concurrent TCP connect / UDP port prober
//!
//! The core is [`ScanEngine`]: it resolves a target, dispatches one probe per
//! port over a fixed-size [`WorkerPool`], and returns a [`ScanReport`] once
//! every probe has finished or timed out.

pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod output;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use config::ScanConfig;
pub use crate::core::{PortProber, ProberFactory};
pub use error::{ProbeError, ScanError};
pub use network::{PortState, ScanMode};
pub use scanner::{scan, ScanEngine, ScanReport, ScanRequest, ScanResult, ScanStats, WorkerPool};

pub type Result<T> = std::result::Result<T, ScanError>;
