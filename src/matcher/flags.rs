//! Flag pattern implementation.
//!
//! A mined address must satisfy `address & mask == required`: every bit the
//! mask selects is pinned to the corresponding required-flag bit, all other
//! bits are free. Flags live in the low-order end of the address, so both
//! patterns are kept as 20-byte right-aligned values.

use crate::crypto::Address;

/// Result of matching an address against a flag pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Every masked bit equals its required flag bit
    Match,
    /// At least one masked bit differs
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// A required bit falls outside the mask: no address could ever match.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("required flags 0x{required} set bits outside mask 0x{mask}")]
pub struct FlagError {
    required: String,
    mask: String,
}

/// A validated flag constraint over the bits of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagPattern {
    required: [u8; 20],
    mask: [u8; 20],
}

impl FlagPattern {
    /// Compiles a flag pattern, rejecting required bits the mask does not cover.
    pub fn new(required: [u8; 20], mask: [u8; 20]) -> Result<Self, FlagError> {
        let consistent = required
            .iter()
            .zip(mask.iter())
            .all(|(r, m)| r & !m == 0);
        if !consistent {
            return Err(FlagError {
                required: hex::encode(required),
                mask: hex::encode(mask),
            });
        }
        Ok(Self { required, mask })
    }

    /// Compiles a pattern from flag bits right-aligned into the address,
    /// the usual shape for low-order capability flags.
    pub fn from_low_bits(required: u64, mask: u64) -> Result<Self, FlagError> {
        let mut r = [0u8; 20];
        let mut m = [0u8; 20];
        r[12..].copy_from_slice(&required.to_be_bytes());
        m[12..].copy_from_slice(&mask.to_be_bytes());
        Self::new(r, m)
    }

    /// Returns the required flag bits.
    pub fn required(&self) -> &[u8; 20] {
        &self.required
    }

    /// Returns the mask.
    pub fn mask(&self) -> &[u8; 20] {
        &self.mask
    }

    /// Matches an address against this pattern.
    #[inline]
    pub fn matches(&self, address: &Address) -> MatchResult {
        let matched = address
            .as_bytes()
            .iter()
            .zip(self.mask.iter())
            .zip(self.required.iter())
            .all(|((a, m), r)| a & m == *r);

        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    /// Number of address bits the mask pins down.
    pub fn constrained_bits(&self) -> u32 {
        self.mask.iter().map(|b| b.count_ones()).sum()
    }

    /// Expected number of candidates until a match: each constrained bit
    /// halves the chance that a uniformly distributed address matches.
    pub fn estimated_difficulty(&self) -> u64 {
        2u64.saturating_pow(self.constrained_bits())
    }

    /// Human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}
