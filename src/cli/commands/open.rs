use std::io::Write;
use std::path::Path;

use crate::cli::context;
use crate::cli::output;
use crate::core::errors::{FilosignError, Result};
use crate::core::models::audit_entry::AuditAction;
use crate::core::models::encrypted_document::EncryptedDocument;

/// Execute the `filosign open` command.
///
/// Plaintext goes to `--output` when given, otherwise to stdout so it
/// can be piped.
pub fn execute(file: &str, output_path: Option<&str>) -> Result<()> {
    let source = Path::new(file);
    if !source.exists() {
        return Err(FilosignError::FileNotFound {
            path: source.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(source)?;
    let document: EncryptedDocument =
        serde_json::from_str(&content).map_err(|e| FilosignError::InvalidDocument {
            path: source.to_path_buf(),
            detail: e.to_string(),
        })?;

    let wallet = context::load_wallet()?;
    let holder = wallet.holder_key();

    let plaintext = context::document_service()
        .decrypt_document(&document, &holder)
        .ok_or(FilosignError::DecryptionNoKey)?;

    match output_path {
        Some(dest) => {
            std::fs::write(dest, &plaintext)?;
            output::success(&format!("Opened {} → {dest}", source.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
        }
    }

    let detail = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    super::audit_helpers::log_audit(AuditAction::Open, Some(detail));
    Ok(())
}
