//! Utility modules for the scanner

pub mod address_parser;
pub mod port_parser;

pub use address_parser::resolve_target;
pub use port_parser::parse_port_spec;

use crate::network::ScanMode;
use std::time::Duration;

/// Logging utilities
pub struct Logger;

impl Logger {
    /// Initialize logger with specified level; `RUST_LOG` still applies on top
    pub fn init(level: log::LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp_secs()
            .try_init();
    }

    /// Map `-v`/`-q` counts onto a level, starting from `info`
    pub fn level_for(verbose: u8, quiet: bool) -> log::LevelFilter {
        if quiet {
            return log::LevelFilter::Warn;
        }
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Log scan start
    pub fn log_scan_start(target: &str, ports: usize, mode: ScanMode) {
        log::info!(
            "Starting {} scan on {} ({} ports)",
            mode.name(),
            target,
            ports
        );
    }

    /// Log scan completion
    pub fn log_scan_complete(duration: Duration, open_ports: usize, total_ports: usize) {
        log::info!(
            "Scan completed in {:.2}s - {}/{} ports open",
            duration.as_secs_f64(),
            open_ports,
            total_ports
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(Logger::level_for(0, false), log::LevelFilter::Info);
        assert_eq!(Logger::level_for(1, false), log::LevelFilter::Debug);
        assert_eq!(Logger::level_for(5, false), log::LevelFilter::Trace);
        assert_eq!(Logger::level_for(2, true), log::LevelFilter::Warn);
    }
}
