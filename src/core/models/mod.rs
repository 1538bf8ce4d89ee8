pub mod audit_entry;
pub mod cached_key;
pub mod encrypted_document;
pub mod public_key;
pub mod secret_keys;
pub mod wallet_address;
