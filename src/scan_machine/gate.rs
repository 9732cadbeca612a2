//! DetectionGate - suppresses repeat detections of the same code
//!
//! A camera keeps decoding the same QR while it stays in frame. The gate admits a
//! payload unless it equals the last admitted payload and the cooldown has not
//! elapsed.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Default cooldown between admissions of the same payload
pub const DEFAULT_SCAN_COOLDOWN: Duration = Duration::from_millis(2000);

pub struct DetectionGate {
    cooldown: Duration,
    last: Mutex<Option<(String, Instant)>>,
}

impl DetectionGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: Mutex::new(None),
        }
    }

    /// Returns true and records the payload if it should be processed
    pub fn admit(&self, payload: &str) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((prev, at)) = last.as_ref() {
            if prev == payload && now.duration_since(*at) < self.cooldown {
                return false;
            }
        }

        *last = Some((payload.to_string(), now));
        true
    }

    /// Forget the last admission
    pub fn clear(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for DetectionGate {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_same_payload_within_cooldown_rejected() {
        let gate = DetectionGate::default();
        assert!(gate.admit("QR-1"));
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(!gate.admit("QR-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_payload_after_cooldown_admitted() {
        let gate = DetectionGate::new(Duration::from_millis(500));
        assert!(gate.admit("QR-1"));
        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(gate.admit("QR-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_payload_admitted() {
        let gate = DetectionGate::default();
        assert!(gate.admit("QR-1"));
        assert!(gate.admit("QR-2"));
        // QR-2 replaced QR-1 as the last admission
        assert!(gate.admit("QR-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_forgets() {
        let gate = DetectionGate::default();
        assert!(gate.admit("QR-1"));
        gate.clear();
        assert!(gate.admit("QR-1"));
    }
}
