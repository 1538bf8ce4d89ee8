use serde::{Deserialize, Serialize};

/// Actions that get recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Init,
    WalletSetup,
    Discover,
    KeyAdd,
    KeyRemove,
    KeyClear,
    Seal,
    Open,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuditAction::Init => "init",
            AuditAction::WalletSetup => "wallet_setup",
            AuditAction::Discover => "discover",
            AuditAction::KeyAdd => "key_add",
            AuditAction::KeyRemove => "key_remove",
            AuditAction::KeyClear => "key_clear",
            AuditAction::Seal => "seal",
            AuditAction::Open => "open",
        };
        f.write_str(name)
    }
}

/// A single entry in the audit log (JSON lines format).
///
/// Never carries document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Wallet address of the local user, or "unknown".
    pub actor: String,
    pub action: AuditAction,
    pub detail: Option<String>,
}
