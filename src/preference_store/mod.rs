//! PreferenceStore - durable scanner session state
//!
//! ## Responsibilities
//!
//! - Persist/retrieve scanner_code, staff_name, assigned_to (and the auth token)
//! - In-memory cache for reads, file write-through on every change
//! - Broadcast session changes to observers
//!
//! Absence of `scanner_code` means "not logged in". Writers are the login and
//! scan machines; last write wins.

mod repository;
mod types;

pub use repository::PreferenceRepository;
pub use types::*;

use crate::error::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::{watch, RwLock};

/// PreferenceStore instance
pub struct PreferenceStore {
    repo: PreferenceRepository,
    cache: RwLock<HashMap<String, String>>,
    session_tx: watch::Sender<Option<ScannerSession>>,
}

impl PreferenceStore {
    /// Open the store at `path`, loading existing entries
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let repo = PreferenceRepository::new(path);
        let entries = repo.load().await?;
        let (session_tx, _) = watch::channel(session_from(&entries));

        tracing::info!(
            path = %repo.path().display(),
            logged_in = entries.contains_key(pref_keys::SCANNER_CODE),
            "PreferenceStore opened"
        );

        Ok(Self {
            repo,
            cache: RwLock::new(entries),
            session_tx,
        })
    }

    // ========================================
    // Raw key-value access
    // ========================================

    pub async fn get(&self, key: &str) -> Option<String> {
        self.cache.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<()> {
        self.update(HashMap::clear).await?;
        tracing::info!("PreferenceStore cleared");
        Ok(())
    }

    // ========================================
    // Session helpers
    // ========================================

    /// Current session, if logged in
    pub async fn session(&self) -> Option<ScannerSession> {
        session_from(&*self.cache.read().await)
    }

    pub async fn scanner_code(&self) -> Option<String> {
        self.get(pref_keys::SCANNER_CODE).await
    }

    pub async fn staff_name(&self) -> Option<String> {
        self.get(pref_keys::STAFF_NAME).await
    }

    pub async fn auth_token(&self) -> Option<String> {
        self.get(pref_keys::AUTH_TOKEN).await
    }

    /// Persist a freshly logged-in session in one write
    pub async fn save_session(&self, session: &ScannerSession) -> Result<()> {
        self.update(|entries| {
            entries.insert(
                pref_keys::SCANNER_CODE.to_string(),
                session.scanner_code.clone(),
            );
            entries.insert(pref_keys::STAFF_NAME.to_string(), session.staff_name.clone());
            put_optional(entries, pref_keys::ASSIGNED_TO, session.assigned_to.as_ref());
            put_optional(entries, pref_keys::AUTH_TOKEN, session.auth_token.as_ref());
        })
        .await?;

        tracing::info!(
            scanner_code = %session.scanner_code,
            staff_name = %session.staff_name,
            "PreferenceStore: Session saved"
        );
        Ok(())
    }

    /// Observe session changes (login/logout)
    pub fn subscribe(&self) -> watch::Receiver<Option<ScannerSession>> {
        self.session_tx.subscribe()
    }

    /// Apply a mutation, persist, then publish the resulting session.
    /// The write lock is held across the file write so writes never interleave.
    async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let mut cache = self.cache.write().await;
        let mut next = cache.clone();
        mutate(&mut next);
        self.repo.save(&next).await?;
        *cache = next;

        let session = session_from(&cache);
        self.session_tx.send_if_modified(|current| {
            if *current != session {
                *current = session;
                true
            } else {
                false
            }
        });

        Ok(())
    }
}

fn put_optional(entries: &mut HashMap<String, String>, key: &str, value: Option<&String>) {
    match value {
        Some(v) => {
            entries.insert(key.to_string(), v.clone());
        }
        None => {
            entries.remove(key);
        }
    }
}

fn session_from(entries: &HashMap<String, String>) -> Option<ScannerSession> {
    let scanner_code = entries.get(pref_keys::SCANNER_CODE)?.clone();
    Some(ScannerSession {
        scanner_code,
        staff_name: entries
            .get(pref_keys::STAFF_NAME)
            .cloned()
            .unwrap_or_default(),
        assigned_to: entries.get(pref_keys::ASSIGNED_TO).cloned(),
        auth_token: entries.get(pref_keys::AUTH_TOKEN).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join(DEFAULT_PREFS_FILE))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_empty_store_not_logged_in() {
        let (_dir, store) = open_temp().await;
        assert!(store.session().await.is_none());
        assert!(store.scanner_code().await.is_none());
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let (dir, store) = open_temp().await;
        let session = ScannerSession::new("GATE01", "Asha", Some("Hall A".to_string()))
            .with_token(Some("tok-123".to_string()));
        store.save_session(&session).await.unwrap();
        drop(store);

        let reopened = PreferenceStore::open(dir.path().join(DEFAULT_PREFS_FILE))
            .await
            .unwrap();
        assert_eq!(reopened.session().await, Some(session));
        assert_eq!(reopened.auth_token().await.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_save_session_drops_stale_assignment() {
        let (_dir, store) = open_temp().await;
        store
            .save_session(&ScannerSession::new("GATE01", "Asha", Some("Hall A".to_string())))
            .await
            .unwrap();
        store
            .save_session(&ScannerSession::new("GATE02", "Ravi", None))
            .await
            .unwrap();

        let session = store.session().await.unwrap();
        assert_eq!(session.scanner_code, "GATE02");
        assert!(session.assigned_to.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_all_fields() {
        let (_dir, store) = open_temp().await;
        store
            .save_session(&ScannerSession::new("GATE01", "Asha", Some("Hall A".to_string())))
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert!(store.session().await.is_none());
        assert!(store.staff_name().await.is_none());
        assert!(store.get(pref_keys::ASSIGNED_TO).await.is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_login_and_logout() {
        let (_dir, store) = open_temp().await;
        let mut rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store
            .save_session(&ScannerSession::new("GATE01", "Asha", None))
            .await
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|s| s.scanner_code.clone()),
            Some("GATE01".to_string())
        );

        store.clear().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn test_unrelated_key_does_not_notify() {
        let (_dir, store) = open_temp().await;
        let rx = store.subscribe();
        store.set("theme", "dark").await.unwrap();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.get("theme").await.as_deref(), Some("dark"));
    }
}
