//! ScanMachine - scan → verify → classify → display → reset cycle
//!
//! ## Responsibilities
//!
//! - Accept decoded QR payloads from a detection source
//! - Issue one verify-entry call at a time, identified by the persisted scanner code
//! - Map the response to a display state and count successful entries
//! - Logout: clear the persisted session and reset the counter
//!
//! State lives in a `watch` channel: `state()` to poll, `subscribe()` to observe.
//! The Idle/Scanning → Verifying transition is a single check-and-set on that
//! channel together with the in-flight flag. The flag outlives the state: a
//! logout mid-call moves to Idle, but detections stay Busy until the call settles.

mod gate;
mod types;

pub use gate::{DetectionGate, DEFAULT_SCAN_COOLDOWN};
pub use types::*;

use crate::preference_store::PreferenceStore;
use crate::scanner_api::{AuthSession, EntryApi, VerifyEntryRequest};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// ScanMachine instance
pub struct ScanMachine {
    api: Arc<dyn EntryApi>,
    store: Arc<PreferenceStore>,
    auth: Arc<AuthSession>,
    gate: DetectionGate,
    state_tx: watch::Sender<ScanState>,
    scan_count: AtomicU64,
    /// Set while a verify call is pending
    in_flight: AtomicBool,
    /// Bumped on logout; results of calls started before it are dropped
    epoch: AtomicU64,
}

impl ScanMachine {
    /// Create new ScanMachine in `Idle`
    pub fn new(
        api: Arc<dyn EntryApi>,
        store: Arc<PreferenceStore>,
        auth: Arc<AuthSession>,
        cooldown: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(ScanState::Idle);
        Self {
            api,
            store,
            auth,
            gate: DetectionGate::new(cooldown),
            state_tx,
            scan_count: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state_tx.subscribe()
    }

    /// Successful entries since the last logout
    pub fn scan_count(&self) -> u64 {
        self.scan_count.load(Ordering::SeqCst)
    }

    /// Logged-in staff name, empty when not logged in
    pub async fn staff_name(&self) -> String {
        self.store.staff_name().await.unwrap_or_default()
    }

    /// Scanner opened: Idle → Scanning
    pub fn arm(&self) {
        self.state_tx.send_if_modified(|state| {
            if *state == ScanState::Idle {
                *state = ScanState::Scanning;
                true
            } else {
                false
            }
        });
    }

    /// Result dismissed: back to Scanning. No-op unless a result is shown.
    pub fn reset(&self) {
        let reset = self.state_tx.send_if_modified(|state| {
            if state.is_result() {
                *state = ScanState::Scanning;
                true
            } else {
                false
            }
        });
        if reset {
            tracing::debug!("ScanMachine: Reset to scanning");
        }
    }

    /// Handle one decoded payload from the detection source
    pub async fn on_detection(&self, qr_data: &str) -> DetectionOutcome {
        let mut outcome = DetectionOutcome::Busy;
        self.state_tx.send_if_modified(|state| {
            if !state.accepts_detections() || self.in_flight.load(Ordering::SeqCst) {
                return false;
            }
            if !self.gate.admit(qr_data) {
                outcome = DetectionOutcome::Duplicate;
                return false;
            }
            self.in_flight.store(true, Ordering::SeqCst);
            *state = ScanState::Verifying;
            outcome = DetectionOutcome::Verified;
            true
        });

        if outcome != DetectionOutcome::Verified {
            tracing::debug!(outcome = ?outcome, "ScanMachine: Detection ignored");
            return outcome;
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let verified_by = self.store.scanner_code().await.unwrap_or_default();
        tracing::debug!(qr_data = %qr_data, verified_by = %verified_by, "ScanMachine: Verifying");

        let request = VerifyEntryRequest {
            qr_data: qr_data.to_string(),
            verified_by,
        };

        let next = match self.api.verify_entry(&request).await {
            Ok(response) => interpret_verification(response),
            Err(e) => {
                tracing::warn!(error = %e, "ScanMachine: Verification call failed");
                failure_state(&e)
            }
        };

        self.settle(epoch, next);
        outcome
    }

    /// Drain a detection source until it closes
    pub async fn run(&self, mut detections: mpsc::Receiver<String>) {
        self.arm();
        while let Some(payload) = detections.recv().await {
            self.on_detection(&payload).await;
        }
        tracing::info!("ScanMachine: Detection source closed");
    }

    /// Clear the persisted session, zero the counter, go Idle
    pub async fn logout(&self) -> crate::Result<()> {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.scan_count.store(0, Ordering::SeqCst);
        self.gate.clear();
        self.state_tx.send_replace(ScanState::Idle);
        self.auth.clear().await;

        self.store.clear().await?;
        tracing::info!("ScanMachine: Logged out");
        Ok(())
    }

    /// Apply a verification result if the call is still current, then
    /// release the in-flight flag
    fn settle(&self, epoch: u64, next: ScanState) {
        let counted = matches!(next, ScanState::Success(_));
        let summary = summarize(&next);

        let applied = self.state_tx.send_if_modified(|state| {
            self.in_flight.store(false, Ordering::SeqCst);
            if *state != ScanState::Verifying || self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            if counted {
                self.scan_count.fetch_add(1, Ordering::SeqCst);
            }
            *state = next;
            true
        });

        if applied {
            tracing::info!(
                result = %summary,
                scan_count = self.scan_count(),
                "ScanMachine: Verification settled"
            );
        } else {
            tracing::debug!(result = %summary, "ScanMachine: Stale result dropped");
        }
    }
}

fn summarize(state: &ScanState) -> String {
    match state {
        ScanState::Success(d) => format!("success registration_id={}", d.registration_id),
        ScanState::AlreadyEntered(d) => format!("already_entered registration_id={}", d.registration_id),
        ScanState::PaymentNotVerified(d) => {
            format!("payment_not_verified registration_id={}", d.registration_id)
        }
        ScanState::Error(message) => format!("error: {}", message),
        ScanState::Idle | ScanState::Scanning | ScanState::Verifying => String::new(),
    }
}
