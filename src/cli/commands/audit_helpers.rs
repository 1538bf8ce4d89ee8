use chrono::Utc;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::context;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::models::audit_entry::{AuditAction, AuditEntry};
use crate::core::traits::audit::AuditLogger;

/// Address of the local wallet, or "unknown" when none is set up.
pub fn actor() -> String {
    context::load_wallet()
        .map(|w| w.address().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Record an audit event. Warns on failure instead of propagating
/// the error, since audit should not block the main operation.
///
/// Skipped silently outside an initialized project.
pub fn log_audit(action: AuditAction, detail: Option<String>) {
    let dir = context::project_dir();
    if !dir.exists() {
        return;
    }

    let config = AppConfig::load_or_default(dir).ok();
    let audit_section = config.as_ref().and_then(|c| c.audit.as_ref());

    if !JsonAuditLogger::is_enabled(audit_section) {
        return;
    }

    let logger = JsonAuditLogger::from_config(dir, audit_section);
    let entry = AuditEntry {
        timestamp: Utc::now(),
        actor: actor(),
        action,
        detail,
    };

    if let Err(e) = logger.log_event(&entry) {
        output::warning(&format!("Could not write audit log: {e}"));
    }
}
