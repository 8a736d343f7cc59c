//! Sequential salt search.

use crate::crypto::{create2, Address};
use crate::matcher::{FlagError, FlagPattern};

/// Default search bound: 2^32 candidates.
///
/// Expected work is about 2^(constrained bits), so this covers any practical
/// flag set while still guaranteeing termination.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1 << 32;

#[derive(Debug, thiserror::Error)]
pub enum MineError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] FlagError),
    #[error("no matching salt in [0, {attempts})")]
    SearchExhausted { attempts: u64 },
}

/// A successful mining outcome: the lowest salt whose derived address
/// carries the required flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningResult {
    /// The winning salt (32 bytes, big-endian).
    pub salt: [u8; 32],
    /// The address the salt derives to.
    pub address: Address,
}

impl MiningResult {
    /// The salt as an attempt number. Mined salts always fit: candidates
    /// occupy the low-order 8 bytes of the salt word.
    pub fn attempt(&self) -> u64 {
        let mut low = [0u8; 8];
        low.copy_from_slice(&self.salt[24..]);
        u64::from_be_bytes(low)
    }

    /// Salt as hex (no 0x).
    pub fn salt_hex(&self) -> String {
        hex::encode(self.salt)
    }

    /// Salt as a decimal string.
    pub fn salt_decimal(&self) -> String {
        self.attempt().to_string()
    }
}

/// Lazy, restartable stream of candidate attempt numbers.
///
/// `full(bound)` scans 0, 1, 2, ... below `bound`; `partition(k, stride,
/// bound)` yields k, k+stride, k+2*stride, ... so parallel workers can split
/// the same sequence with no coordination. Both views ascend, which is what
/// lets a worker stop as soon as a candidate can no longer be the minimum.
#[derive(Debug, Clone)]
pub struct SaltSequence {
    next: u64,
    stride: u64,
    bound: u64,
}

impl SaltSequence {
    /// The complete sequence below `bound`.
    pub fn full(bound: u64) -> Self {
        Self::partition(0, 1, bound)
    }

    /// The strided sub-sequence starting at `start`.
    pub fn partition(start: u64, stride: u64, bound: u64) -> Self {
        assert!(stride > 0, "stride must be positive");
        Self {
            next: start,
            stride,
            bound,
        }
    }
}

impl Iterator for SaltSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.bound {
            return None;
        }
        let attempt = self.next;
        self.next = attempt.checked_add(self.stride).unwrap_or(u64::MAX);
        Some(attempt)
    }
}

/// The 32-byte big-endian salt for an attempt number.
#[inline]
pub fn salt_bytes(attempt: u64) -> [u8; 32] {
    let mut salt = [0u8; 32];
    salt[24..].copy_from_slice(&attempt.to_be_bytes());
    salt
}

/// Finds the lowest salt in `[0, max_attempts)` whose derived address
/// satisfies `address & flag_mask == required_flags`.
///
/// Deterministic: identical inputs always return the identical result.
/// The flag pattern is validated before any candidate is derived.
pub fn find_salt(
    deployer: &Address,
    required_flags: [u8; 20],
    flag_mask: [u8; 20],
    init_code_hash: &[u8; 32],
    max_attempts: u64,
) -> Result<MiningResult, MineError> {
    let pattern = FlagPattern::new(required_flags, flag_mask)?;
    scan(
        deployer,
        &pattern,
        init_code_hash,
        SaltSequence::full(max_attempts),
    )
    .ok_or(MineError::SearchExhausted {
        attempts: max_attempts,
    })
}

/// Scans one candidate stream; returns the first match in stream order.
fn scan(
    deployer: &Address,
    pattern: &FlagPattern,
    init_code_hash: &[u8; 32],
    candidates: SaltSequence,
) -> Option<MiningResult> {
    for attempt in candidates {
        let salt = salt_bytes(attempt);
        let address = create2::derive_address(deployer, &salt, init_code_hash);
        if pattern.matches(&address).is_match() {
            return Some(MiningResult { salt, address });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYER: [u8; 20] = [0x11u8; 20];
    const INIT_HASH: [u8; 32] = [0x22u8; 32];

    fn bit6() -> ([u8; 20], [u8; 20]) {
        let mut flags = [0u8; 20];
        flags[19] = 0x40;
        (flags, flags)
    }

    #[test]
    fn test_salt_sequence_full() {
        let attempts: Vec<u64> = SaltSequence::full(5).collect();
        assert_eq!(attempts, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_salt_sequence_partitions_cover_everything() {
        let mut all: Vec<u64> = (0..4)
            .flat_map(|k| SaltSequence::partition(k, 4, 23))
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..23).collect::<Vec<u64>>());
    }

    #[test]
    fn test_salt_bytes_big_endian() {
        let salt = salt_bytes(0x0102);
        assert_eq!(salt[30], 0x01);
        assert_eq!(salt[31], 0x02);
        assert!(salt[..30].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_mask_returns_salt_zero() {
        let deployer = Address::from_bytes(DEPLOYER);
        let result = find_salt(&deployer, [0u8; 20], [0u8; 20], &INIT_HASH, 10).unwrap();
        assert_eq!(result.attempt(), 0);
        assert_eq!(
            result.address,
            create2::derive_address(&deployer, &salt_bytes(0), &INIT_HASH)
        );
    }

    #[test]
    fn test_single_bit_scenario() {
        let deployer = Address::from_bytes(DEPLOYER);
        let (flags, mask) = bit6();

        let result = find_salt(&deployer, flags, mask, &INIT_HASH, 1 << 16).unwrap();
        assert_eq!(result.address.as_bytes()[19] & 0x40, 0x40);

        // Identical inputs return the identical salt
        let again = find_salt(&deployer, flags, mask, &INIT_HASH, 1 << 16).unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_minimality() {
        let deployer = Address::from_bytes(DEPLOYER);
        let (flags, mask) = bit6();
        let pattern = FlagPattern::new(flags, mask).unwrap();

        let result = find_salt(&deployer, flags, mask, &INIT_HASH, 1 << 16).unwrap();
        for attempt in 0..result.attempt() {
            let address = create2::derive_address(&deployer, &salt_bytes(attempt), &INIT_HASH);
            assert!(
                !pattern.matches(&address).is_match(),
                "salt {} below the result also matches",
                attempt
            );
        }
    }

    #[test]
    fn test_zero_attempts_exhausts() {
        let deployer = Address::from_bytes(DEPLOYER);
        let result = find_salt(&deployer, [0u8; 20], [0u8; 20], &INIT_HASH, 0);
        assert!(matches!(
            result,
            Err(MineError::SearchExhausted { attempts: 0 })
        ));
    }

    #[test]
    fn test_invalid_request_rejected_before_search() {
        let deployer = Address::from_bytes(DEPLOYER);
        let mut flags = [0u8; 20];
        flags[19] = 0x40;

        // Even with a zero bound the flag check fires first
        let result = find_salt(&deployer, flags, [0u8; 20], &INIT_HASH, 0);
        assert!(matches!(result, Err(MineError::InvalidRequest(_))));
    }

    #[test]
    fn test_result_salt_rendering() {
        let result = MiningResult {
            salt: salt_bytes(255),
            address: Address::from_bytes([0u8; 20]),
        };
        assert_eq!(result.salt_decimal(), "255");
        assert!(result.salt_hex().ends_with("ff"));
        assert_eq!(result.salt_hex().len(), 64);
    }
}
