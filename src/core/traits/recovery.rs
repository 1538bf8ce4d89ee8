use crate::core::errors::Result;
use crate::core::models::public_key::PublicKey;
use crate::core::models::wallet_address::WalletAddress;

/// Port for the elliptic-curve primitives used by public key discovery.
///
/// The core only depends on this trait; `adapters::recovery` provides the
/// secp256k1 implementation.
pub trait SignatureRecovery: Send + Sync {
    /// Hash a message with the personal-message prefix convention.
    fn hash_message(&self, message: &str) -> [u8; 32];

    /// Recover the signer's public key from a prehashed message.
    fn recover_public_key(&self, hash: &[u8; 32], signature: &[u8]) -> Result<PublicKey>;

    /// Recover the signer's address from a prehashed message.
    fn recover_address(&self, hash: &[u8; 32], signature: &[u8]) -> Result<WalletAddress>;

    /// Derive the address that owns `public_key`.
    fn address_of(&self, public_key: &PublicKey) -> WalletAddress;
}
