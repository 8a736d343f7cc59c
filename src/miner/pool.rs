//! Worker pool: parallel salt search over strided partitions.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

use crate::crypto::Address;
use crate::matcher::FlagPattern;

use super::cpu::{CpuWorker, WorkerStats};
use super::search::{MiningResult, SaltSequence};
use super::MineError;

/// What `poll` observed since the previous call.
#[derive(Debug, Clone, Copy)]
pub enum PoolEvent {
    /// A worker reported a matching salt. Lower partitions may still be
    /// scanning, so this is a candidate until the pool finishes.
    Candidate(MiningResult),
    /// Nothing happened before the timeout elapsed.
    Idle,
    /// Every worker has finished its partition.
    Done,
}

/// Runs the salt search across worker threads.
///
/// Each worker owns a strided partition of `[0, max_attempts)`; the shared
/// best-attempt cutoff makes the pooled answer identical to the sequential
/// scan's: the lowest matching salt.
pub struct WorkerPool {
    num_workers: usize,
    max_attempts: u64,
    handles: Option<Vec<JoinHandle<()>>>,
    result_rx: Receiver<MiningResult>,
    best: Option<MiningResult>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` workers. Fails before any thread starts if the
    /// flag pattern is inconsistent.
    pub fn spawn(
        num_workers: usize,
        deployer: Address,
        required_flags: [u8; 20],
        flag_mask: [u8; 20],
        init_code_hash: [u8; 32],
        max_attempts: u64,
    ) -> Result<Self, MineError> {
        let pattern = FlagPattern::new(required_flags, flag_mask)?;
        let num_workers = num_workers.max(1);

        let (result_tx, result_rx) = bounded(num_workers);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());
        let best = Arc::new(AtomicU64::new(u64::MAX));

        let handles = (0..num_workers)
            .map(|id| {
                let worker = CpuWorker::new(
                    id,
                    deployer,
                    pattern,
                    init_code_hash,
                    SaltSequence::partition(id as u64, num_workers as u64, max_attempts),
                    best.clone(),
                    result_tx.clone(),
                    stop_flag.clone(),
                    stats.clone(),
                );
                thread::Builder::new()
                    .name(format!("miner-worker-{}", id))
                    .spawn(move || worker.run())
                    .expect("Failed to spawn worker thread")
            })
            .collect();

        // Channel disconnects once the last worker exits
        drop(result_tx);

        Ok(Self {
            num_workers,
            max_attempts,
            handles: Some(handles),
            result_rx,
            best: None,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Waits up to `timeout` for pool activity.
    pub fn poll(&mut self, timeout: Duration) -> PoolEvent {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => {
                self.record(result);
                PoolEvent::Candidate(result)
            }
            Err(RecvTimeoutError::Timeout) => PoolEvent::Idle,
            Err(RecvTimeoutError::Disconnected) => PoolEvent::Done,
        }
    }

    /// Drains remaining candidates, joins every worker and returns the
    /// lowest matching salt, or `SearchExhausted` if no partition matched.
    pub fn finish(mut self) -> Result<MiningResult, MineError> {
        while let Ok(result) = self.result_rx.recv() {
            self.record(result);
        }
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
        self.best.ok_or(MineError::SearchExhausted {
            attempts: self.max_attempts,
        })
    }

    fn record(&mut self, result: MiningResult) {
        let better = self
            .best
            .map_or(true, |current| result.attempt() < current.attempt());
        if better {
            self.best = Some(result);
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Clone of the stop flag for external use (e.g. signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn total_salts(&self) -> u64 {
        self.stats.total_salts()
    }

    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn salts_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_salts() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}
