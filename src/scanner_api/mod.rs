//! Scanner API - remote verification client
//!
//! Two request/response operations against the ticketing backend:
//! `login(scanner_code)` and `verify_entry(qr_data, verified_by)`.
//!
//! ## Module layout
//! - `types`: wire types
//! - `session`: bearer token holder
//! - `client`: `EntryApi` trait and the reqwest implementation

pub mod client;
pub mod session;
pub mod types;

pub use client::{ApiError, EntryApi, ScannerApiClient};
pub use session::AuthSession;
pub use types::*;
