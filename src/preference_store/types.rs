//! PreferenceStore type definitions

use serde::{Deserialize, Serialize};

/// Default file name of the durable store
pub const DEFAULT_PREFS_FILE: &str = "scanner_prefs.json";

// ============================================================
// Key definitions
// ============================================================

/// Keys persisted in the preference store
pub mod pref_keys {
    pub const SCANNER_CODE: &str = "scanner_code";
    pub const STAFF_NAME: &str = "staff_name";
    pub const ASSIGNED_TO: &str = "assigned_to";
    pub const AUTH_TOKEN: &str = "auth_token";
}

/// Logged-in scanner session
///
/// Created on successful login, persisted until logout clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSession {
    pub scanner_code: String,
    pub staff_name: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl ScannerSession {
    pub fn new(
        scanner_code: impl Into<String>,
        staff_name: impl Into<String>,
        assigned_to: Option<String>,
    ) -> Self {
        Self {
            scanner_code: scanner_code.into(),
            staff_name: staff_name.into(),
            assigned_to,
            auth_token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }
}
