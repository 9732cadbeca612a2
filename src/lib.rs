//! Entry Scanner Library
//!
//! Event check-in scanner client core
//!
//! ## Architecture (5 Components)
//!
//! 1. PreferenceStore - durable scanner session (key-value file)
//! 2. ScannerApi - login / entry verification over HTTP
//! 3. TicketClassifier - attendee ticket → display category
//! 4. ScanMachine - scan → verify → classify → display → reset
//! 5. LoginMachine - code entry → login → persisted session
//!
//! The camera pipeline and UI are collaborators: detections come in as
//! decoded strings, display state goes out through `watch` channels.

pub mod error;
pub mod login_machine;
pub mod preference_store;
pub mod scan_machine;
pub mod scanner_api;
pub mod state;
pub mod ticket_classifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use state::{AppConfig, AppState, Route};
