use crate::core::errors::Result;
use crate::core::models::public_key::PublicKey;
use crate::core::models::secret_keys::{ContentKey, HolderKey};

/// Port for the hybrid encryption backend behind dual-access documents.
///
/// Implementations live in `adapters::cipher`. The core never touches
/// curve arithmetic or AEAD state directly.
pub trait CipherBackend: Send + Sync {
    /// Encrypt a document body under a content key.
    fn seal(&self, key: &ContentKey, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt a document body. `None` on any authentication failure.
    fn open(&self, key: &ContentKey, ciphertext: &[u8]) -> Option<Vec<u8>>;

    /// Wrap a content key for one recipient.
    ///
    /// Must be deterministic for a given (content key, public key) pair and
    /// must not embed anything that identifies the recipient.
    fn wrap_key(&self, key: &ContentKey, recipient: &PublicKey) -> Result<Vec<u8>>;

    /// Unwrap a content key with the holder's private key.
    /// `None` when the slot was not wrapped for this holder.
    fn unwrap_key(&self, wrapped: &[u8], holder: &HolderKey) -> Option<ContentKey>;

    /// Human-readable name of this backend.
    fn name(&self) -> &str;
}
