//! Flag-bit matching for 20-byte addresses.

mod flags;

pub use flags::{FlagError, FlagPattern, MatchResult};
