//! Deployment transport seam and post-deployment verification.

use crate::crypto::Address;
use crate::miner::{self, MineError};
use crate::request::DeploymentRequest;

/// External deployment transport.
///
/// Implementations perform the actual creation (typically a factory call on
/// chain) and report the address that was produced. The crate ships no
/// transport of its own; signing and broadcasting stay outside its scope.
pub trait Deployer {
    /// Deploys `init_code` under `salt`, returning the created address.
    ///
    /// Must fail with [`DeployError::Collision`] when the target address is
    /// already occupied; re-deploying a used salt + init-code pair never
    /// silently succeeds.
    fn deploy(&mut self, init_code: &[u8], salt: [u8; 32]) -> Result<Address, DeployError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("address {0} is already occupied")]
    Collision(Address),
}

/// Failure of a full mine -> deploy -> verify run. Only `Mine(SearchExhausted)`
/// is worth retrying, with a wider bound; everything else is terminal for
/// the invocation.
#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Mine(#[from] MineError),
    #[error(transparent)]
    Deploy(#[from] DeployError),
    #[error("deployed to {actual} but predicted {expected}")]
    AddressMismatch { expected: Address, actual: Address },
}

/// Checks the transport produced exactly the predicted address.
///
/// A mismatch means the flag bits of the deployed artifact are no longer
/// guaranteed, so it is fatal: the whole operation counts as failed, no
/// partially-deployed state is reported as success.
pub fn verify(actual: Address, predicted: Address) -> Result<(), DeploymentError> {
    if actual == predicted {
        Ok(())
    } else {
        Err(DeploymentError::AddressMismatch {
            expected: predicted,
            actual,
        })
    }
}

/// Mines a salt for `request`, deploys through `deployer` and verifies the
/// produced address. Returns the verified address.
///
/// Ordering is strict: the transport is called only after mining succeeds,
/// and verification only after the transport returns.
pub fn execute(
    request: &DeploymentRequest,
    deployer: &mut dyn Deployer,
    max_attempts: u64,
) -> Result<Address, DeploymentError> {
    let mined = miner::mine(request, max_attempts)?;
    let actual = deployer.deploy(&request.full_init_code(), mined.salt)?;
    verify(actual, mined.address)?;
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::create2;
    use crate::miner::DEFAULT_MAX_ATTEMPTS;
    use std::collections::HashSet;

    /// Applies the real CREATE2 formula and tracks occupied addresses.
    struct InMemoryDeployer {
        deployer: Address,
        occupied: HashSet<Address>,
    }

    impl InMemoryDeployer {
        fn new(deployer: Address) -> Self {
            Self {
                deployer,
                occupied: HashSet::new(),
            }
        }
    }

    impl Deployer for InMemoryDeployer {
        fn deploy(&mut self, init_code: &[u8], salt: [u8; 32]) -> Result<Address, DeployError> {
            let hash = create2::init_code_hash(init_code, &[]);
            let address = create2::derive_address(&self.deployer, &salt, &hash);
            if !self.occupied.insert(address) {
                return Err(DeployError::Collision(address));
            }
            Ok(address)
        }
    }

    /// Always lands somewhere other than predicted.
    struct MisroutedDeployer;

    impl Deployer for MisroutedDeployer {
        fn deploy(&mut self, _init_code: &[u8], _salt: [u8; 32]) -> Result<Address, DeployError> {
            Ok(Address::from_bytes([0xee; 20]))
        }
    }

    fn request() -> DeploymentRequest {
        let mut flags = [0u8; 20];
        flags[19] = 0x40;
        DeploymentRequest::new(
            Address::from_bytes([0x33; 20]),
            flags,
            flags,
            vec![0x60, 0x80, 0x60, 0x40],
            vec![0x00, 0x2a],
        )
    }

    #[test]
    fn test_round_trip_never_mismatches() {
        let request = request();
        let mut transport = InMemoryDeployer::new(*request.deployer());

        let deployed = execute(&request, &mut transport, DEFAULT_MAX_ATTEMPTS).unwrap();
        let mined = crate::miner::mine(&request, DEFAULT_MAX_ATTEMPTS).unwrap();
        assert_eq!(deployed, mined.address);
        assert_eq!(deployed.as_bytes()[19] & 0x40, 0x40);
    }

    #[test]
    fn test_redeploying_same_request_collides() {
        let request = request();
        let mut transport = InMemoryDeployer::new(*request.deployer());

        execute(&request, &mut transport, DEFAULT_MAX_ATTEMPTS).unwrap();
        // Mining is deterministic, so the second run targets the same address
        let second = execute(&request, &mut transport, DEFAULT_MAX_ATTEMPTS);
        assert!(matches!(
            second,
            Err(DeploymentError::Deploy(DeployError::Collision(_)))
        ));
    }

    #[test]
    fn test_misrouted_transport_aborts_with_mismatch() {
        let request = request();
        let result = execute(&request, &mut MisroutedDeployer, DEFAULT_MAX_ATTEMPTS);
        assert!(matches!(
            result,
            Err(DeploymentError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_accepts_equal_addresses() {
        let addr = Address::from_bytes([5u8; 20]);
        assert!(verify(addr, addr).is_ok());
    }

    #[test]
    fn test_invalid_request_fails_before_transport() {
        let mut flags = [0u8; 20];
        flags[19] = 0x40;
        let request = DeploymentRequest::new(
            Address::from_bytes([0x33; 20]),
            flags,
            [0u8; 20], // mask does not cover the required bit
            vec![0x60],
            vec![],
        );
        let result = execute(&request, &mut MisroutedDeployer, DEFAULT_MAX_ATTEMPTS);
        assert!(matches!(
            result,
            Err(DeploymentError::Mine(MineError::InvalidRequest(_)))
        ));
    }
}
