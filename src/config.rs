//! Configuration module for the portprobe scanner

use crate::network::ScanMode;
use crate::ScanError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the home directory by [`ScanConfig::load_default_config`]
pub const DEFAULT_CONFIG_FILE: &str = ".portprobe.toml";

/// Main configuration structure for scanning operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// List of ports to scan, without duplicates
    pub ports: Vec<u16>,

    /// Probe mode
    pub mode: ScanMode,

    /// Maximum number of probes in flight
    pub concurrency: usize,

    /// Timeout for each probe in milliseconds
    pub timeout: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ports: (1..=1024).collect(),
            mode: ScanMode::Tcp,
            concurrency: 100,
            timeout: 1000,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ports to scan. Duplicates are dropped, first occurrence wins.
    pub fn with_ports<I>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        let mut seen = HashSet::new();
        self.ports = ports.into_iter().filter(|port| seen.insert(*port)).collect();
        self
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the timeout in milliseconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout from fractional seconds, as typed on the command line.
    /// Any positive value gives at least one millisecond.
    pub fn with_timeout_secs(mut self, seconds: f64) -> Self {
        self.timeout = if seconds > 0.0 {
            ((seconds * 1000.0).round() as u64).max(1)
        } else {
            0
        };
        self
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScanError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_toml(&content).map_err(|e| {
            ScanError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Self::parse_toml(content)
            .map_err(|e| ScanError::ConfigError(format!("Failed to parse TOML: {}", e)))
    }

    fn parse_toml(content: &str) -> Result<Self, toml::de::Error> {
        let config: ScanConfig = toml::from_str(content)?;

        // Files may list a port twice; normalise through the builder.
        let ports = config.ports.clone();
        Ok(config.with_ports(ports))
    }

    /// Path of the per-user configuration file, if a home directory is known
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `~/.portprobe.toml`, falling back to defaults
    pub fn load_default_config() -> Self {
        let Some(path) = Self::default_config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::from_toml_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.ports.is_empty() {
            return Err(ScanError::PortRangeError("No ports specified".to_string()));
        }

        if self.ports.contains(&0) {
            return Err(ScanError::PortRangeError("Port 0 is not valid".to_string()));
        }

        if self.concurrency == 0 {
            return Err(ScanError::ConfigError(
                "Concurrency limit must be greater than 0".to_string(),
            ));
        }

        if self.timeout == 0 {
            return Err(ScanError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
