use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{FilosignError, Result};

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

/// A wallet address, case-folded to lowercase.
///
/// Two addresses that differ only in hex casing (e.g. EIP-55 checksummed
/// and plain lowercase) compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse `0x` + 40 hex characters.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !Self::is_well_formed(trimmed) {
            return Err(FilosignError::InvalidAddress {
                input: input.to_string(),
            });
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Build an address from the 20 trailing bytes of a key hash.
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn is_well_formed(input: &str) -> bool {
        ADDRESS_RE.is_match(input)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
