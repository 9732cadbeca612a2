//! Login state types

use serde::Serialize;

pub const BLANK_CODE: &str = "Please enter scanner code";
pub const LOGIN_FAILED: &str = "Login failed";
pub const SCANNER_NOT_FOUND: &str = "Scanner not found or inactive";

/// Login display state: `Idle -> Loading -> {Success, Error}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum LoginState {
    Idle,
    Loading,
    Success {
        staff_name: String,
        assigned_to: Option<String>,
    },
    Error(String),
}

impl LoginState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Scanner codes are entered case-insensitively and stored uppercased
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  gate01 ").as_deref(), Some("GATE01"));
        assert_eq!(normalize_code("\t \n"), None);
        assert_eq!(normalize_code(""), None);
    }
}
