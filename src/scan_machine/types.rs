//! Scan state types and response interpretation

use crate::scanner_api::{ApiError, AttendeeDetails, VerifyEntryResponse};
use crate::ticket_classifier::{classify, TicketCategory, TicketColor};
use serde::Serialize;

/// Substring (case-insensitive) marking an unpaid registration
pub const PAYMENT_NOT_VERIFIED: &str = "payment not verified";

/// Fallback message when the server gives none
pub const VERIFICATION_FAILED: &str = "Verification failed";

/// Scan display state
///
/// `Idle -> Scanning -> Verifying -> {Success, AlreadyEntered, PaymentNotVerified, Error}`,
/// then `reset` returns to `Scanning`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    Scanning,
    Verifying,
    Success(AttendeeDetails),
    /// Entry was verified earlier (warning response)
    AlreadyEntered(AttendeeDetails),
    PaymentNotVerified(AttendeeDetails),
    Error(String),
}

impl ScanState {
    /// Only Idle and Scanning may start a verification
    pub fn accepts_detections(&self) -> bool {
        matches!(self, Self::Idle | Self::Scanning)
    }

    pub fn is_result(&self) -> bool {
        matches!(
            self,
            Self::Success(_) | Self::AlreadyEntered(_) | Self::PaymentNotVerified(_) | Self::Error(_)
        )
    }

    pub fn details(&self) -> Option<&AttendeeDetails> {
        match self {
            Self::Success(d) | Self::AlreadyEntered(d) | Self::PaymentNotVerified(d) => Some(d),
            Self::Idle | Self::Scanning | Self::Verifying | Self::Error(_) => None,
        }
    }

    /// Ticket category of the attendee (UNKNOWN when there is none)
    pub fn category(&self) -> TicketCategory {
        classify(self.details())
    }

    /// Result banner headline
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Success(_) => "✓ ENTRY VERIFIED",
            Self::AlreadyEntered(_) => "⚠ ALREADY ENTERED",
            Self::PaymentNotVerified(_) => "✗ PAYMENT NOT VERIFIED",
            Self::Error(_) => "✗ ERROR",
            Self::Idle | Self::Scanning | Self::Verifying => "",
        }
    }

    /// Result banner color. Success takes the ticket category's color.
    pub fn background_color(&self) -> Option<TicketColor> {
        match self {
            Self::Success(d) => Some(classify(Some(d)).background_color),
            Self::AlreadyEntered(_) => Some(TicketColor::Orange),
            Self::PaymentNotVerified(_) | Self::Error(_) => Some(TicketColor::Red),
            Self::Idle | Self::Scanning | Self::Verifying => None,
        }
    }

    /// Secondary line under the attendee name
    pub fn note(&self) -> Option<String> {
        match self {
            Self::AlreadyEntered(d) => Some(format!(
                "Already verified at {}",
                d.entry_verified_at.as_deref().unwrap_or_default()
            )),
            Self::Error(message) => Some(message.clone()),
            _ => None,
        }
    }
}

/// What happened to one detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// A verify call was issued and has settled
    Verified,
    /// A verification is in flight or a result is on screen
    Busy,
    /// Same payload seen within the cooldown window
    Duplicate,
}

/// Map a successful (2xx) verify response to the next state
pub fn interpret_verification(response: VerifyEntryResponse) -> ScanState {
    let VerifyEntryResponse {
        success,
        message,
        error,
        warning,
        details,
    } = response;

    let payment_unverified = error
        .as_deref()
        .is_some_and(|e| e.to_lowercase().contains(PAYMENT_NOT_VERIFIED));

    match details {
        Some(d) if success => ScanState::Success(d),
        Some(d) if warning == Some(true) => ScanState::AlreadyEntered(d),
        Some(d) if payment_unverified => ScanState::PaymentNotVerified(d),
        _ => ScanState::Error(
            error
                .or(message)
                .unwrap_or_else(|| VERIFICATION_FAILED.to_string()),
        ),
    }
}

/// Map a failed verify call to an Error state
pub fn failure_state(error: &ApiError) -> ScanState {
    let message = match error {
        ApiError::Rejected { status, .. } => format!("Server error: {}", status),
        ApiError::Malformed(detail) | ApiError::Transport(detail) => {
            format!("Connection error: {}", detail)
        }
    };
    ScanState::Error(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendee() -> AttendeeDetails {
        AttendeeDetails {
            registration_id: "HD-0042".to_string(),
            full_name: "Meera Nair".to_string(),
            ticket_type: Some("Standard".to_string()),
            final_price: Some(799.0),
            entry_verified_at: Some("2026-02-14T09:12:00Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_success_wins_over_warning() {
        let state = interpret_verification(VerifyEntryResponse {
            success: true,
            warning: Some(true),
            details: Some(attendee()),
            ..Default::default()
        });
        assert!(matches!(state, ScanState::Success(_)));
    }

    #[test]
    fn test_warning_is_already_entered() {
        let state = interpret_verification(VerifyEntryResponse {
            warning: Some(true),
            details: Some(attendee()),
            ..Default::default()
        });
        assert_eq!(state, ScanState::AlreadyEntered(attendee()));
        assert_eq!(
            state.note().as_deref(),
            Some("Already verified at 2026-02-14T09:12:00Z")
        );
    }

    #[test]
    fn test_payment_not_verified_case_insensitive() {
        let state = interpret_verification(VerifyEntryResponse {
            error: Some("PAYMENT NOT VERIFIED for this registration".to_string()),
            details: Some(attendee()),
            ..Default::default()
        });
        assert!(matches!(state, ScanState::PaymentNotVerified(_)));
    }

    #[test]
    fn test_flags_without_details_are_errors() {
        let state = interpret_verification(VerifyEntryResponse {
            success: true,
            message: Some("Verified".to_string()),
            ..Default::default()
        });
        assert_eq!(state, ScanState::Error("Verified".to_string()));

        let state = interpret_verification(VerifyEntryResponse {
            error: Some("Payment not verified".to_string()),
            ..Default::default()
        });
        assert_eq!(state, ScanState::Error("Payment not verified".to_string()));
    }

    #[test]
    fn test_error_message_precedence() {
        let state = interpret_verification(VerifyEntryResponse {
            error: Some("Invalid QR".to_string()),
            message: Some("Bad request".to_string()),
            ..Default::default()
        });
        assert_eq!(state, ScanState::Error("Invalid QR".to_string()));

        let state = interpret_verification(VerifyEntryResponse::default());
        assert_eq!(state, ScanState::Error(VERIFICATION_FAILED.to_string()));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            failure_state(&ApiError::Rejected {
                status: 500,
                message: None
            }),
            ScanState::Error("Server error: 500".to_string())
        );
        assert_eq!(
            failure_state(&ApiError::Transport("Request timed out".to_string())),
            ScanState::Error("Connection error: Request timed out".to_string())
        );
    }

    #[test]
    fn test_presentation() {
        let success = ScanState::Success(attendee());
        assert_eq!(success.headline(), "✓ ENTRY VERIFIED");
        assert_eq!(success.background_color(), Some(TicketColor::Blue));
        assert_eq!(success.category().display_text, "STANDARD TICKET");

        let unpaid = ScanState::PaymentNotVerified(attendee());
        assert_eq!(unpaid.background_color(), Some(TicketColor::Red));

        let error = ScanState::Error("Invalid QR".to_string());
        assert!(error.details().is_none());
        assert_eq!(error.category(), TicketCategory::unknown());
        assert_eq!(error.note().as_deref(), Some("Invalid QR"));

        assert_eq!(ScanState::Verifying.headline(), "");
        assert!(ScanState::Verifying.background_color().is_none());
    }

    #[test]
    fn test_only_idle_and_scanning_accept() {
        assert!(ScanState::Idle.accepts_detections());
        assert!(ScanState::Scanning.accepts_detections());
        assert!(!ScanState::Verifying.accepts_detections());
        assert!(!ScanState::Success(attendee()).accepts_detections());
        assert!(!ScanState::Error("x".to_string()).accepts_detections());
    }
}
