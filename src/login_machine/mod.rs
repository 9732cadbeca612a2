//! LoginMachine - code entry → login call → persisted session
//!
//! ## Responsibilities
//!
//! - Reject blank codes locally, before any network call
//! - One login call at a time
//! - On success persist the session and install the auth token
//! - One-shot navigation signal after a successful login

mod types;

pub use types::*;

use crate::preference_store::{PreferenceStore, ScannerSession};
use crate::scanner_api::{ApiError, AuthSession, EntryApi, LoginRequest, LoginResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// LoginMachine instance
pub struct LoginMachine {
    api: Arc<dyn EntryApi>,
    store: Arc<PreferenceStore>,
    auth: Arc<AuthSession>,
    state_tx: watch::Sender<LoginState>,
    navigation_pending: AtomicBool,
}

impl LoginMachine {
    pub fn new(api: Arc<dyn EntryApi>, store: Arc<PreferenceStore>, auth: Arc<AuthSession>) -> Self {
        let (state_tx, _) = watch::channel(LoginState::Idle);
        Self {
            api,
            store,
            auth,
            state_tx,
            navigation_pending: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> LoginState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state_tx.subscribe()
    }

    /// Submit a scanner code. Returns the state the attempt settled in.
    pub async fn submit(&self, raw_code: &str) -> LoginState {
        if self.state_tx.borrow().is_loading() {
            tracing::debug!("Login: Attempt already in flight");
            return LoginState::Loading;
        }

        let Some(code) = normalize_code(raw_code) else {
            tracing::debug!("Login: Blank scanner code rejected");
            let state = LoginState::Error(BLANK_CODE.to_string());
            self.state_tx.send_replace(state.clone());
            return state;
        };

        let started = self.state_tx.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = LoginState::Loading;
            true
        });
        if !started {
            tracing::debug!("Login: Attempt already in flight");
            return LoginState::Loading;
        }

        tracing::info!(scanner_code = %code, "Login: Submitting");
        self.navigation_pending.store(false, Ordering::SeqCst);

        let result = self
            .api
            .login(&LoginRequest {
                scanner_code: code.clone(),
            })
            .await;

        let next = match result {
            Ok(response) => self.accept(response).await,
            Err(e) => failure_state(&e),
        };

        match &next {
            LoginState::Success { staff_name, .. } => {
                tracing::info!(scanner_code = %code, staff_name = %staff_name, "Login: Success");
                self.navigation_pending.store(true, Ordering::SeqCst);
            }
            LoginState::Error(message) => {
                tracing::warn!(scanner_code = %code, message = %message, "Login: Failed");
            }
            LoginState::Idle | LoginState::Loading => {}
        }

        self.state_tx.send_replace(next.clone());
        next
    }

    /// True exactly once after each successful login
    pub fn take_navigation(&self) -> bool {
        self.navigation_pending.swap(false, Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.navigation_pending.store(false, Ordering::SeqCst);
        self.state_tx.send_replace(LoginState::Idle);
    }

    async fn accept(&self, response: LoginResponse) -> LoginState {
        let LoginResponse {
            success,
            message,
            scanner,
            token,
        } = response;

        let scanner = match scanner {
            Some(scanner) if success => scanner,
            _ => {
                return LoginState::Error(
                    message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| LOGIN_FAILED.to_string()),
                )
            }
        };

        let session = ScannerSession::new(
            scanner.scanner_code,
            scanner.staff_name,
            scanner.assigned_to,
        )
        .with_token(token);

        if let Err(e) = self.store.save_session(&session).await {
            tracing::error!(error = %e, "Login: Failed to persist session");
            return LoginState::Error(format!("Failed to save session: {}", e));
        }
        self.auth.set(session.auth_token.clone()).await;

        LoginState::Success {
            staff_name: session.staff_name,
            assigned_to: session.assigned_to,
        }
    }
}

fn failure_state(error: &ApiError) -> LoginState {
    match error {
        ApiError::Rejected { .. } | ApiError::Malformed(_) => {
            LoginState::Error(SCANNER_NOT_FOUND.to_string())
        }
        ApiError::Transport(detail) => LoginState::Error(format!("Connection error: {}", detail)),
    }
}
