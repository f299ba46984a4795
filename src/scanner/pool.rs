//! Fixed-size worker pool for probe dispatch
//!
//! The pool is owned by its caller and has an explicit lifecycle:
//! [`WorkerPool::new`] spawns the workers, [`WorkerPool::dispatch`] queues
//! requests, and [`WorkerPool::shutdown`] closes the queue and waits for every
//! queued probe to finish. Each worker takes one request at a time from the
//! shared queue, so at most `size` probes are ever in flight.

use crate::core::PortProber;
use crate::error::ProbeError;
use crate::scanner::{ScanRequest, ScanResult};
use crate::ScanError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

type SharedQueue = Arc<Mutex<mpsc::UnboundedReceiver<ScanRequest>>>;

pub struct WorkerPool {
    queue: mpsc::UnboundedSender<ScanRequest>,
    results: mpsc::UnboundedReceiver<ScanResult>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers on the current tokio runtime
    pub fn new(size: usize, prober: Arc<dyn PortProber>) -> crate::Result<Self> {
        if size == 0 {
            return Err(ScanError::ConfigError(
                "Worker pool needs at least one worker".to_string(),
            ));
        }

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let queue_rx: SharedQueue = Arc::new(Mutex::new(queue_rx));
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let workers = (0..size)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    queue_rx.clone(),
                    result_tx.clone(),
                    prober.clone(),
                ))
            })
            .collect();

        log::debug!("Started {} probe workers using {}", size, prober.name());

        Ok(Self {
            queue: queue_tx,
            results: result_rx,
            workers,
        })
    }

    /// Number of workers, which is also the in-flight probe limit
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a probe. Never waits for a free worker.
    pub fn dispatch(&self, request: ScanRequest) -> crate::Result<()> {
        self.queue.send(request).map_err(|_| ScanError::PoolClosed)
    }

    /// Close the queue, let the workers drain it, and collect every result in
    /// completion order.
    pub async fn shutdown(self) -> Vec<ScanResult> {
        let Self {
            queue,
            mut results,
            workers,
        } = self;
        drop(queue);

        for worker in workers {
            if let Err(e) = worker.await {
                log::error!("Probe worker failed: {}", e);
            }
        }

        let mut collected = Vec::new();
        while let Some(result) = results.recv().await {
            collected.push(result);
        }
        collected
    }
}

async fn run_worker(
    id: usize,
    queue: SharedQueue,
    results: mpsc::UnboundedSender<ScanResult>,
    prober: Arc<dyn PortProber>,
) {
    loop {
        // Hold the lock only while waiting for the next request.
        let next = queue.lock().await.recv().await;
        let Some(request) = next else { break };

        let result = run_probe(prober.clone(), request).await;
        if result.open {
            log::info!("Port {} is open", result.port);
        } else if let Some(error) = &result.error {
            log::debug!("Port {} closed: {}", result.port, error);
        }

        if results.send(result).is_err() {
            break;
        }
    }
    log::trace!("Probe worker {} finished", id);
}

/// Run one probe in its own task so a panic stays contained to its port.
async fn run_probe(prober: Arc<dyn PortProber>, request: ScanRequest) -> ScanResult {
    let port = request.port;
    let start = Instant::now();
    let outcome = tokio::spawn(async move { prober.probe(&request).await }).await;
    let elapsed = start.elapsed();

    match outcome {
        Ok(Ok(())) => ScanResult::open(port, elapsed),
        Ok(Err(error)) => ScanResult::closed(port, error, elapsed),
        Err(e) => {
            log::warn!("An error occurred while scanning port {}: {}", port, e);
            ScanResult::closed(port, ProbeError::Aborted(e.to_string()), elapsed)
        }
    }
}
