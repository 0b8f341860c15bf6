// THEORY:
// The `ParallelDetector` runs many independent detections at once. Detection
// is CPU-bound and synchronous, so every frame is handed to tokio's blocking
// pool instead of an async worker. A semaphore caps how many frames are in
// flight, by default one per CPU core, so a large batch cannot flood the
// blocking pool with work that would only compete for the same cores.
//
// The detector itself is immutable and shared behind an `Arc`; each worker
// allocates its own masks. Results come back in input order.

use crate::core_modules::frame::Frame;
use crate::error::Result;
use crate::pipeline::{Logo, LogoDetector};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

pub struct ParallelDetector {
    detector: Arc<LogoDetector>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl ParallelDetector {
    /// One worker per CPU core.
    pub fn new(detector: LogoDetector) -> Self {
        Self::with_workers(detector, num_cpus::get())
    }

    /// At most `workers` frames are processed at the same time (at least one).
    pub fn with_workers(detector: LogoDetector, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            detector: Arc::new(detector),
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn detector(&self) -> &LogoDetector {
        &self.detector
    }

    /// Detects logos in one frame on the blocking pool.
    pub async fn find_logos(&self, frame: Frame) -> Result<Vec<Logo>> {
        let _permit = self.permits.acquire().await?;

        let detector = Arc::clone(&self.detector);
        tokio::task::spawn_blocking(move || detector.find_logos(&frame)).await?
    }

    /// Detects logos in every frame; the i-th result belongs to the i-th frame.
    pub async fn find_logos_in_batch(&self, frames: Vec<Frame>) -> Vec<Result<Vec<Logo>>> {
        let count = frames.len();
        info!(frames = count, workers = self.workers, "starting detection batch");

        let results = join_all(frames.into_iter().map(|frame| self.find_logos(frame))).await;

        let found: usize = results
            .iter()
            .filter_map(|result| result.as_ref().ok())
            .map(Vec::len)
            .sum();
        let failed = results.iter().filter(|result| result.is_err()).count();
        debug!(failed, "batch results collected");
        info!(frames = count, logos = found, "finished detection batch");

        results
    }
}
