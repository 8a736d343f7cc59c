//! # flag_miner
//!
//! CREATE2 salt miner for flag-encoded contract addresses. Some deployment
//! schemes read capability flags out of the low-order bits of a contract's
//! address; this crate finds the lowest salt whose derived address carries a
//! required flag set, and verifies the address an external deployment
//! transport actually produced.
//!
//! ## Architecture
//!
//! - `crypto`: Keccak-256 and CREATE2 address derivation
//! - `matcher`: Flag-bit constraints over addresses
//! - `request`: The immutable per-deployment input
//! - `miner`: Sequential and pooled salt search
//! - `deploy`: Deployment transport seam and verification
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod deploy;
pub mod matcher;
pub mod miner;
pub mod request;

pub use config::Config;
pub use crypto::Address;
pub use deploy::{Deployer, DeploymentError};
pub use matcher::{FlagPattern, MatchResult};
pub use miner::{MineError, MiningResult, WorkerPool, DEFAULT_MAX_ATTEMPTS};
pub use request::DeploymentRequest;
