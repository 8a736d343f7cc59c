//! CREATE2 address derivation.
//!
//! Matches the EVM CREATE2 formula (EIP-1014):
//!   address = keccak256(0xff || deployer || salt || initCodeHash)[12:32]

use super::{keccak256, Address};

/// Hashes the full creation payload: keccak256(init_code || constructor_args).
///
/// Computed once per request and reused across every salt candidate.
pub fn init_code_hash(init_code: &[u8], constructor_args: &[u8]) -> [u8; 32] {
    let mut payload = Vec::with_capacity(init_code.len() + constructor_args.len());
    payload.extend_from_slice(init_code);
    payload.extend_from_slice(constructor_args);
    keccak256(&payload)
}

/// Computes the address a CREATE2 deployment would produce.
/// Preimage: 0xff (1) || deployer (20) || salt (32) || init_code_hash (32) = 85 bytes.
/// Address = keccak256(preimage)[12..32].
pub fn derive_address(deployer: &Address, salt: &[u8; 32], init_code_hash: &[u8; 32]) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(salt);
    preimage[53..85].copy_from_slice(init_code_hash);

    let hash = keccak256(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}
