//! Salt search: sequential scan and parallel worker pool.
//!
//! Both entry points honor the same contract: the result is the lowest salt
//! in `[0, max_attempts)` whose derived address carries the required flags,
//! or `SearchExhausted` when none does.

mod cpu;
mod pool;
mod search;

pub use cpu::{CpuWorker, WorkerStats};
pub use pool::{PoolEvent, WorkerPool};
pub use search::{find_salt, salt_bytes, MineError, MiningResult, SaltSequence, DEFAULT_MAX_ATTEMPTS};

use crate::request::DeploymentRequest;

/// Mines the lowest matching salt for a full request.
pub fn mine(request: &DeploymentRequest, max_attempts: u64) -> Result<MiningResult, MineError> {
    find_salt(
        request.deployer(),
        request.required_flags(),
        request.flag_mask(),
        request.init_code_hash(),
        max_attempts,
    )
}
