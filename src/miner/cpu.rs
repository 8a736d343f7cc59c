//! CPU worker scanning one strided partition of the salt sequence.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::crypto::{create2, Address};
use crate::matcher::FlagPattern;

use super::search::{salt_bytes, MiningResult, SaltSequence};

/// Shared counters across all workers of a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    pub salts_tried: AtomicU64,
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_salts(&self) -> u64 {
        self.salts_tried.load(Ordering::Relaxed)
    }

    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// A worker that derives and tests candidate salts from its partition.
///
/// Workers share `best`, the lowest matching attempt found anywhere so far.
/// Since every partition ascends, a worker stops once its next candidate is
/// at or above `best`: nothing it could still test can win. That cutoff is
/// what keeps the pooled search's answer identical to a sequential scan.
pub struct CpuWorker {
    id: usize,
    deployer: Address,
    pattern: FlagPattern,
    init_code_hash: [u8; 32],
    candidates: SaltSequence,
    best: Arc<AtomicU64>,
    result_tx: Sender<MiningResult>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        deployer: Address,
        pattern: FlagPattern,
        init_code_hash: [u8; 32],
        candidates: SaltSequence,
        best: Arc<AtomicU64>,
        result_tx: Sender<MiningResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            deployer,
            pattern,
            init_code_hash,
            candidates,
            best,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the scan until the partition ends, the candidate can no longer
    /// beat the current best, or the pool signals a stop.
    pub fn run(mut self) {
        // Flush stats in batches to keep atomic traffic off the hot loop
        const STATS_BATCH: u64 = 1024;
        let mut pending: u64 = 0;

        while let Some(attempt) = self.candidates.next() {
            if attempt >= self.best.load(Ordering::Relaxed) {
                break;
            }
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            let salt = salt_bytes(attempt);
            let address = create2::derive_address(&self.deployer, &salt, &self.init_code_hash);
            pending += 1;
            if pending == STATS_BATCH {
                self.stats.salts_tried.fetch_add(pending, Ordering::Relaxed);
                pending = 0;
            }

            if self.pattern.matches(&address).is_match() {
                let previous = self.best.fetch_min(attempt, Ordering::Relaxed);
                if attempt < previous {
                    self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                    // Ignore send failure: the pool may already be gone
                    let _ = self.result_tx.send(MiningResult { salt, address });
                }
                // Own partition ascends, nothing later can beat this match
                break;
            }
        }

        self.stats.salts_tried.fetch_add(pending, Ordering::Relaxed);
    }

    pub fn id(&self) -> usize {
        self.id
    }
}
