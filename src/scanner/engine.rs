//! Scan dispatcher: resolves the target, fans ports out over a worker pool and
//! assembles the report once every probe has come back.

use crate::config::ScanConfig;
use crate::core::{PortProber, ProberFactory};
use crate::scanner::{ScanReport, ScanRequest, WorkerPool};
use crate::utils::{resolve_target, Logger};
use std::sync::Arc;
use std::time::Instant;

/// Main scanning engine
pub struct ScanEngine {
    config: ScanConfig,
    prober: Arc<dyn PortProber>,
}

impl ScanEngine {
    /// Create a new scan engine with the given configuration
    pub fn new(config: ScanConfig) -> crate::Result<Self> {
        let prober = ProberFactory::for_mode(config.mode);
        Self::with_prober(config, prober)
    }

    /// Create an engine that probes through a custom [`PortProber`]
    pub fn with_prober(
        mut config: ScanConfig,
        prober: Arc<dyn PortProber>,
    ) -> crate::Result<Self> {
        // `ports` is a public field; one probe per port needs a real set.
        let ports = std::mem::take(&mut config.ports);
        let config = config.with_ports(ports);
        config.validate()?;
        Ok(Self { config, prober })
    }

    /// Probe every configured port on `target` once.
    ///
    /// Fails before dispatching anything if the target does not resolve or no
    /// socket can be created for it. Individual probe failures only show up as
    /// closed ports in the report.
    pub async fn scan(&self, target: &str) -> crate::Result<ScanReport> {
        let start_time = Instant::now();
        let mode = self.config.mode;

        let address = resolve_target(target).await?;
        self.prober.preflight(mode, address)?;

        Logger::log_scan_start(target, self.config.ports.len(), mode);

        // Workers beyond the port count would only sit idle.
        let workers = self.config.concurrency.min(self.config.ports.len());
        let pool = WorkerPool::new(workers, self.prober.clone())?;

        let timeout = self.config.timeout_duration();
        for &port in &self.config.ports {
            pool.dispatch(ScanRequest::new(address, port, timeout, mode))?;
        }

        let results = pool.shutdown().await;

        let mut report = ScanReport::new(target.to_string(), address, mode);
        for result in results {
            report.add_result(result);
        }
        report.set_duration(start_time.elapsed());

        Logger::log_scan_complete(report.duration, report.open_ports.len(), report.total_ports());
        Ok(report)
    }
}

/// Scan `ports` on `target` using the mode, timeout and concurrency of `config`.
///
/// `ports` replaces whatever port set `config` carried.
pub async fn scan<I>(target: &str, ports: I, config: ScanConfig) -> crate::Result<ScanReport>
where
    I: IntoIterator<Item = u16>,
{
    ScanEngine::new(config.with_ports(ports))?.scan(target).await
}
