//! Scripted `EntryApi` for state machine tests

use crate::scanner_api::{
    ApiError, EntryApi, LoginRequest, LoginResponse, VerifyEntryRequest, VerifyEntryResponse,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct FakeEntryApi {
    login_responses: Mutex<VecDeque<Result<LoginResponse, ApiError>>>,
    verify_responses: Mutex<VecDeque<Result<VerifyEntryResponse, ApiError>>>,
    login_calls: Mutex<Vec<LoginRequest>>,
    verify_calls: Mutex<Vec<VerifyEntryRequest>>,
    login_hold: Mutex<Option<Arc<Notify>>>,
    verify_hold: Mutex<Option<Arc<Notify>>>,
}

impl FakeEntryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, response: Result<LoginResponse, ApiError>) {
        self.login_responses.lock().unwrap().push_back(response);
    }

    pub fn push_verify(&self, response: Result<VerifyEntryResponse, ApiError>) {
        self.verify_responses.lock().unwrap().push_back(response);
    }

    /// Block login calls until the returned handle is notified
    pub fn hold_login(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.login_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// Block verify calls until the returned handle is notified
    pub fn hold_verify(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.verify_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn login_calls(&self) -> Vec<LoginRequest> {
        self.login_calls.lock().unwrap().clone()
    }

    pub fn verify_calls(&self) -> Vec<VerifyEntryRequest> {
        self.verify_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntryApi for FakeEntryApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.login_calls.lock().unwrap().push(request.clone());
        let hold = self.login_hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.login_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted login response".to_string())))
    }

    async fn verify_entry(
        &self,
        request: &VerifyEntryRequest,
    ) -> Result<VerifyEntryResponse, ApiError> {
        self.verify_calls.lock().unwrap().push(request.clone());
        let hold = self.verify_hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.verify_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted verify response".to_string())))
    }
}
