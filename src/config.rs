//! Runtime configuration for flag-address salt mining.

use clap::Parser;

use crate::crypto::{create2, Address};
use crate::miner::DEFAULT_MAX_ATTEMPTS;

/// CREATE2 Flag Address Miner
///
/// Mines salts until the CREATE2-derived address carries the required flag
/// bits, i.e. address & mask == flags.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Deployer (factory/proxy) address — 20 bytes hex, with or without 0x
    #[arg(long)]
    pub deployer: String,

    /// Required flag bits, hex, right-aligned into the address (e.g. 0x40)
    #[arg(long)]
    pub flags: String,

    /// Flag mask, hex, right-aligned; mined addresses satisfy
    /// address & mask == flags
    #[arg(long)]
    pub mask: String,

    /// Contract init code, hex
    #[arg(long)]
    pub init_code: Option<String>,

    /// ABI-encoded constructor arguments, hex; appended to the init code
    /// before hashing
    #[arg(long, default_value = "")]
    pub constructor_args: String,

    /// keccak256(initCode || constructorArgs), 32 bytes hex; alternative to
    /// --init-code when only the salt is needed
    #[arg(long)]
    pub init_code_hash: Option<String>,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Give up after this many candidate salts
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u64,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Address::from_hex(&self.deployer).is_err() {
            return Err(ConfigError::InvalidConfig(
                "deployer must be 20 bytes (40 hex chars)".into(),
            ));
        }

        let flags = parse_right_aligned::<20>(&self.flags)
            .ok_or_else(|| ConfigError::InvalidFlags("flags must be 1-40 hex chars".into()))?;
        let mask = parse_right_aligned::<20>(&self.mask)
            .ok_or_else(|| ConfigError::InvalidFlags("mask must be 1-40 hex chars".into()))?;
        if flags.iter().zip(mask.iter()).any(|(f, m)| f & !m != 0) {
            return Err(ConfigError::InvalidFlags(
                "flags set bits outside the mask; no address could match".into(),
            ));
        }

        match (&self.init_code, &self.init_code_hash) {
            (None, None) => {
                return Err(ConfigError::InvalidConfig(
                    "either --init-code or --init-code-hash is required".into(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidConfig(
                    "--init-code and --init-code-hash are mutually exclusive".into(),
                ));
            }
            (Some(code), None) => {
                if decode_hex_blob(code).is_none() {
                    return Err(ConfigError::InvalidConfig(
                        "init_code must be even-length hex".into(),
                    ));
                }
                if decode_hex_blob(&self.constructor_args).is_none() {
                    return Err(ConfigError::InvalidConfig(
                        "constructor_args must be even-length hex".into(),
                    ));
                }
            }
            (None, Some(hash)) => {
                let h = hash.strip_prefix("0x").unwrap_or(hash);
                if h.len() != 64 || !h.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ConfigError::InvalidConfig(
                        "init_code_hash must be 32 bytes (64 hex chars)".into(),
                    ));
                }
                if !self.constructor_args.is_empty() {
                    return Err(ConfigError::InvalidConfig(
                        "constructor_args only apply together with --init-code".into(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Deployer address (after validation).
    pub fn deployer_address(&self) -> Address {
        Address::from_hex(&self.deployer).expect("validated address")
    }

    /// Required flags as a right-aligned 20-byte pattern.
    pub fn flags_bytes(&self) -> [u8; 20] {
        parse_right_aligned::<20>(&self.flags).expect("validated hex")
    }

    /// Mask as a right-aligned 20-byte pattern.
    pub fn mask_bytes(&self) -> [u8; 20] {
        parse_right_aligned::<20>(&self.mask).expect("validated hex")
    }

    /// Init code bytes, when provided.
    pub fn init_code_bytes(&self) -> Option<Vec<u8>> {
        self.init_code
            .as_deref()
            .map(|code| decode_hex_blob(code).expect("validated hex"))
    }

    /// Constructor argument bytes.
    pub fn constructor_args_bytes(&self) -> Vec<u8> {
        decode_hex_blob(&self.constructor_args).expect("validated hex")
    }

    /// The hash every candidate is derived against: the given
    /// --init-code-hash, or keccak256(init_code || constructor_args).
    pub fn effective_init_code_hash(&self) -> [u8; 32] {
        if let Some(ref hash) = self.init_code_hash {
            let h = hash.strip_prefix("0x").unwrap_or(hash);
            let bytes = hex::decode(h).expect("validated hex");
            bytes.try_into().expect("32 bytes")
        } else {
            let code = self.init_code_bytes().expect("validated config");
            create2::init_code_hash(&code, &self.constructor_args_bytes())
        }
    }
}

/// Decodes short hex (0x optional, odd length allowed) right-aligned into
/// N bytes. None if empty, too long or not hex.
fn parse_right_aligned<const N: usize>(input: &str) -> Option<[u8; N]> {
    let h = input.strip_prefix("0x").unwrap_or(input);
    if h.is_empty() || h.len() > 2 * N || !h.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let padded = if h.len() % 2 == 1 {
        format!("0{}", h)
    } else {
        h.to_string()
    };
    let bytes = hex::decode(&padded).ok()?;
    let mut out = [0u8; N];
    out[N - bytes.len()..].copy_from_slice(&bytes);
    Some(out)
}

/// Decodes an even-length hex blob (0x optional, empty allowed).
fn decode_hex_blob(input: &str) -> Option<Vec<u8>> {
    let h = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(h).ok()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid flags: {0}")]
    InvalidFlags(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config() -> Config {
        Config {
            deployer: "0x4e59b44847b379578588920ca78fbf26c0b4956c".into(),
            flags: "0x40".into(),
            mask: "0x40".into(),
            init_code: Some("0x6080604052".into()),
            constructor_args: String::new(),
            init_code_hash: None,
            workers: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            report_interval: 5,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = make_test_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.flags_bytes()[19], 0x40);
        assert_eq!(config.mask_bytes()[19], 0x40);
    }

    #[test]
    fn test_flags_outside_mask_rejected() {
        let mut config = make_test_config();
        config.mask = "0x0f".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_deployer_rejected() {
        let mut config = make_test_config();
        config.deployer = "0x1234".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_init_code_or_hash_required() {
        let mut config = make_test_config();
        config.init_code = None;
        assert!(config.validate().is_err());

        config.init_code_hash =
            Some("0x1234567890123456789012345678901234567890123456789012345678901234".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_init_code_and_hash_exclusive() {
        let mut config = make_test_config();
        config.init_code_hash =
            Some("0x1234567890123456789012345678901234567890123456789012345678901234".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_hash_matches_direct_computation() {
        let mut config = make_test_config();
        config.constructor_args = "0x002a".into();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.effective_init_code_hash(),
            create2::init_code_hash(&[0x60, 0x80, 0x60, 0x40, 0x52], &[0x00, 0x2a])
        );
    }

    #[test]
    fn test_odd_length_flags_left_padded() {
        let mut config = make_test_config();
        config.flags = "0x4".into();
        config.mask = "0xf".into();
        assert!(config.validate().is_ok());
        assert_eq!(config.flags_bytes()[19], 0x04);
    }
}
