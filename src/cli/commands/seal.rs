use std::path::{Path, PathBuf};

use crate::adapters::key_stores::file_key_value_store::FileKeyValueStore;
use crate::adapters::recovery::secp256k1_recovery::Secp256k1Recovery;
use crate::cli::context;
use crate::cli::output;
use crate::core::errors::{FilosignError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::public_key::PublicKey;
use crate::core::services::public_key_service::PublicKeyService;

/// Execute the `filosign seal` command.
///
/// Each party is either an address with a cached key or a literal
/// `0x04…` public key. The sealed document carries neither address.
pub fn execute(file: &str, party_a: &str, party_b: &str, output_path: Option<&str>) -> Result<()> {
    let service = context::key_service()?;

    let source = Path::new(file);
    if !source.exists() {
        return Err(FilosignError::FileNotFound {
            path: source.to_path_buf(),
        });
    }

    let key_a = resolve_party(&service, party_a)?;
    let key_b = resolve_party(&service, party_b)?;

    let plaintext = std::fs::read(source)?;
    let document = context::document_service().encrypt_document(&plaintext, &key_a, &key_b)?;

    let json = serde_json::to_string_pretty(&document).map_err(|e| {
        FilosignError::EncryptionFailed {
            reason: format!("cannot serialize sealed document: {e}"),
        }
    })?;

    let dest = output_path
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(source));
    std::fs::write(&dest, json)?;

    output::success(&format!(
        "Sealed {} → {} ({} bytes)",
        source.display(),
        dest.display(),
        plaintext.len()
    ));

    let detail = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    super::audit_helpers::log_audit(AuditAction::Seal, Some(detail));
    Ok(())
}

/// Public key for a party argument: parsed directly, or looked up in
/// the key cache when it is an address.
fn resolve_party(
    service: &PublicKeyService<FileKeyValueStore, Secp256k1Recovery>,
    party: &str,
) -> Result<PublicKey> {
    let party = party.trim();
    if PublicKey::is_well_formed(party) {
        return PublicKey::parse(party);
    }

    service
        .get_public_key(party)?
        .ok_or_else(|| FilosignError::KeyNotCached {
            address: party.to_lowercase(),
        })
}

/// `<file>.filosign.json` next to the source document.
fn default_output(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".filosign.json");
    PathBuf::from(name)
}
