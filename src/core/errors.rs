use std::path::PathBuf;

/// All domain errors for FiloSign.
///
/// Every variant renders a message that can be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum FilosignError {
    #[error(
        "Invalid wallet address: '{input}'\n\n  \
         Expected 0x followed by 40 hex characters."
    )]
    InvalidAddress { input: String },

    #[error(
        "Invalid public key: '{input}'\n\n  \
         Expected an uncompressed secp256k1 key: 0x04 followed by 128 hex characters."
    )]
    InvalidPublicKey { input: String },

    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    #[error(
        "Public key discovery failed: {reason}\n\n  \
         The wallet did not sign the discovery message. \
         Approve the signature request in your wallet and try again."
    )]
    SignerFailed { reason: String },

    #[error("Public key discovery failed: {reason}")]
    RecoveryFailed { reason: String },

    #[error(
        "Public key discovery failed: signature validation failed\n\n  \
         The signature was produced by {recovered}, not {expected}.\n  \
         Only the owner of an address can publish its public key."
    )]
    SignatureMismatch { expected: String, recovered: String },

    #[error("Key cache {operation} failed: {reason}")]
    StorageFailed {
        operation: &'static str,
        reason: String,
    },

    #[error("Encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    #[error(
        "Decryption failed: no matching key found\n\n  \
         This document was not sealed for your wallet's public key.\n\n  \
         Solutions:\n    \
         → Check the active wallet: filosign wallet show\n    \
         → Ask the sender to seal the document for your address"
    )]
    DecryptionNoKey,

    #[error(
        "No cached public key for {address}\n\n  \
         Solutions:\n    \
         → Have the owner run: filosign keys discover\n    \
         → Or add a known key: filosign keys add {address} <0x04…>\n    \
         → Or pass the public key itself instead of the address"
    )]
    KeyNotCached { address: String },

    #[error("Invalid sealed document {path}: {detail}")]
    InvalidDocument { path: PathBuf, detail: String },

    #[error(
        "No wallet found at {path}\n\n  \
         Run 'filosign wallet setup' to create one."
    )]
    WalletNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Audit log error: {detail}")]
    AuditError { detail: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(
        "This project uses format version {project_version}, but your FiloSign \
         only supports up to version {supported_version}."
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilosignError>;
