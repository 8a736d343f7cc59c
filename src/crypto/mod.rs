//! Keccak-256 and CREATE2 address derivation.
//!
//! Deployment address formula:
//! - address = keccak256(0xff || deployer || salt || initCodeHash)[12..32]  [85 bytes -> 20 bytes]
//! - initCodeHash = keccak256(initCode || constructorArgs), computed once per request

mod address;
pub mod create2;

pub use address::{Address, ParseAddressError};
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        // keccak256("") is a well-known constant
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_deterministic() {
        let input = b"deterministic";
        assert_eq!(keccak256(input), keccak256(input));
    }
}
