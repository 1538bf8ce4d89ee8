use serde::{Deserialize, Serialize};

/// Scheme tag written into every sealed document.
pub const ENCRYPTION_METHOD: &str = "privacy-preserving-dual-access";

/// A document sealed for exactly two public keys.
///
/// Holds no address and no party identifier. The two wrapped-key slots are
/// told apart by position only, so a reader has to try both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedDocument {
    /// Hex of `nonce || ciphertext || tag` under the content key.
    pub encrypted_data: String,
    pub encrypted_key_for_party_a: String,
    pub encrypted_key_for_party_b: String,
    pub encryption_method: String,
}

impl EncryptedDocument {
    pub fn is_known_method(&self) -> bool {
        self.encryption_method == ENCRYPTION_METHOD
    }
}

/// The two wrapped-key positions, tried in this order when opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    A,
    B,
}

impl KeySlot {
    pub const ORDER: [KeySlot; 2] = [KeySlot::A, KeySlot::B];

    pub fn wrapped_key(self, doc: &EncryptedDocument) -> &str {
        match self {
            KeySlot::A => &doc.encrypted_key_for_party_a,
            KeySlot::B => &doc.encrypted_key_for_party_b,
        }
    }
}
