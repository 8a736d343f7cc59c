//! The immutable inputs for one mining + deployment run.

use crate::crypto::{create2, Address};
use crate::matcher::{FlagError, FlagPattern};

/// Everything needed to mine a salt and deploy one artifact.
///
/// The deployer address is an explicit field rather than process-wide
/// configuration so tests can substitute arbitrary deployers. The init-code
/// hash is computed once at construction and reused for every candidate.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    deployer: Address,
    required_flags: [u8; 20],
    flag_mask: [u8; 20],
    init_code: Vec<u8>,
    constructor_args: Vec<u8>,
    init_code_hash: [u8; 32],
}

impl DeploymentRequest {
    pub fn new(
        deployer: Address,
        required_flags: [u8; 20],
        flag_mask: [u8; 20],
        init_code: Vec<u8>,
        constructor_args: Vec<u8>,
    ) -> Self {
        let init_code_hash = create2::init_code_hash(&init_code, &constructor_args);
        Self {
            deployer,
            required_flags,
            flag_mask,
            init_code,
            constructor_args,
            init_code_hash,
        }
    }

    pub fn deployer(&self) -> &Address {
        &self.deployer
    }

    pub fn required_flags(&self) -> [u8; 20] {
        self.required_flags
    }

    pub fn flag_mask(&self) -> [u8; 20] {
        self.flag_mask
    }

    pub fn init_code(&self) -> &[u8] {
        &self.init_code
    }

    pub fn constructor_args(&self) -> &[u8] {
        &self.constructor_args
    }

    /// keccak256(init_code || constructor_args), shared by every candidate.
    pub fn init_code_hash(&self) -> &[u8; 32] {
        &self.init_code_hash
    }

    /// The full creation payload handed to the deployment transport.
    pub fn full_init_code(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.init_code.len() + self.constructor_args.len());
        payload.extend_from_slice(&self.init_code);
        payload.extend_from_slice(&self.constructor_args);
        payload
    }

    /// The compiled flag constraint; fails if a required bit falls outside
    /// the mask.
    pub fn flag_pattern(&self) -> Result<FlagPattern, FlagError> {
        FlagPattern::new(self.required_flags, self.flag_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_code_hash_covers_args() {
        let deployer = Address::from_bytes([1u8; 20]);
        let with_args = DeploymentRequest::new(
            deployer,
            [0u8; 20],
            [0u8; 20],
            vec![0x60, 0x80],
            vec![0x00, 0x2a],
        );
        let without_args =
            DeploymentRequest::new(deployer, [0u8; 20], [0u8; 20], vec![0x60, 0x80], vec![]);
        assert_ne!(with_args.init_code_hash(), without_args.init_code_hash());
        assert_eq!(with_args.full_init_code(), vec![0x60, 0x80, 0x00, 0x2a]);
    }

    #[test]
    fn test_flag_pattern_validation() {
        let deployer = Address::from_bytes([1u8; 20]);
        let mut flags = [0u8; 20];
        flags[19] = 0x40;
        let bad = DeploymentRequest::new(deployer, flags, [0u8; 20], vec![], vec![]);
        assert!(bad.flag_pattern().is_err());

        let mut mask = [0u8; 20];
        mask[19] = 0xc0;
        let good = DeploymentRequest::new(deployer, flags, mask, vec![], vec![]);
        assert!(good.flag_pattern().is_ok());
    }
}
