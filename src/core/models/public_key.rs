use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{FilosignError, Result};

/// Length of an uncompressed SEC1 point: marker byte + two 32-byte coordinates.
pub const PUBLIC_KEY_LEN: usize = 65;

/// SEC1 marker byte for an uncompressed point.
pub const UNCOMPRESSED_MARKER: u8 = 0x04;

static PUBLIC_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x04[0-9a-fA-F]{128}$").expect("valid public key regex"));

/// An uncompressed secp256k1 public key as recovered from a wallet signature.
///
/// Only the encoding is checked here. Whether the bytes are a point on the
/// curve is up to the crypto adapters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Parse the `0x04…` hex form used in the cache and on the command line.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !Self::is_well_formed(trimmed) {
            return Err(FilosignError::InvalidPublicKey {
                input: input.to_string(),
            });
        }

        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        hex::decode_to_slice(&trimmed[2..], &mut bytes).map_err(|_| {
            FilosignError::InvalidPublicKey {
                input: input.to_string(),
            }
        })?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| FilosignError::InvalidPublicKey {
                    input: hex::encode(bytes),
                })?;
        if array[0] != UNCOMPRESSED_MARKER {
            return Err(FilosignError::InvalidPublicKey {
                input: hex::encode(bytes),
            });
        }
        Ok(Self(array))
    }

    /// Wrap an encoding produced by a curve library as an uncompressed point.
    pub(crate) fn from_array(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        debug_assert_eq!(bytes[0], UNCOMPRESSED_MARKER);
        Self(bytes)
    }

    pub fn is_well_formed(input: &str) -> bool {
        PUBLIC_KEY_RE.is_match(input)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Lowercase `0x04…` hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}
