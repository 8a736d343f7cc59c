//! 20-byte contract address with hex and EIP-55 rendering.

use std::fmt;

/// A deployment address (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parses a 40-hex-char address, with or without the 0x prefix.
    pub fn from_hex(input: &str) -> Result<Self, ParseAddressError> {
        let h = input.strip_prefix("0x").unwrap_or(input);
        if h.len() != 40 || !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseAddressError(input.to_string()));
        }
        let bytes = hex::decode(h).expect("validated hex");
        Ok(Self(bytes.try_into().expect("20 bytes")))
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex (no 0x).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// With 0x prefix.
    pub fn to_hex_prefixed(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// EIP-55 checksum encoding.
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = super::keccak256(hex_addr.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in hex_addr.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid address: {0} (expected 40 hex chars)")]
pub struct ParseAddressError(String);

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}
