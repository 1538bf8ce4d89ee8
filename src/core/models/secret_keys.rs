use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const CONTENT_KEY_LEN: usize = 32;
pub const HOLDER_KEY_LEN: usize = 32;

/// One-time symmetric key that encrypts a document body.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey([u8; CONTENT_KEY_LEN]);

impl ContentKey {
    /// Fresh uniformly random key from the OS RNG.
    pub fn generate() -> Self {
        let mut key = [0u8; CONTENT_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let key: [u8; CONTENT_KEY_LEN] = slice.try_into().ok()?;
        Some(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; CONTENT_KEY_LEN] {
        &self.0
    }
}

/// Private scalar of a wallet, needed to open a document sealed for it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HolderKey([u8; HOLDER_KEY_LEN]);

impl HolderKey {
    pub fn new(bytes: [u8; HOLDER_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HOLDER_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for HolderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HolderKey(..)")
    }
}
