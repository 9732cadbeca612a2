//! Scanner API wire types
//!
//! Field names follow the backend's snake_case JSON as-is.

use serde::{Deserialize, Serialize};

/// Login endpoint path
pub const LOGIN_PATH: &str = "api/scanner/login";

/// Entry verification endpoint path
pub const VERIFY_ENTRY_PATH: &str = "api/admin/entry/verify";

// ============================================================
// Login
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub scanner_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub scanner: Option<ScannerInfo>,
    /// Bearer token, when the backend issues one
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerInfo {
    pub scanner_code: String,
    pub staff_name: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

// ============================================================
// Entry verification
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEntryRequest {
    pub qr_data: String,
    pub verified_by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyEntryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Set when the entry was already verified earlier
    #[serde(default)]
    pub warning: Option<bool>,
    #[serde(default)]
    pub details: Option<AttendeeDetails>,
}

/// Attendee record returned by entry verification. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendeeDetails {
    #[serde(default)]
    pub registration_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub final_price: Option<f64>,
    #[serde(default)]
    pub participation_mode: Option<String>,
    #[serde(default)]
    pub verified_at: Option<String>,
    #[serde(default)]
    pub verified_by: Option<String>,
    #[serde(default)]
    pub entry_verified_at: Option<String>,
    #[serde(default)]
    pub entry_verified_by: Option<String>,
}
