//! ScannerApiClient HTTP Client
//!
//! ## Responsibilities
//! - POST login / entry verification to the backend
//! - Attach the bearer token held by `AuthSession`
//! - Classify failures into rejection / malformed body / transport

use super::session::AuthSession;
use super::types::*;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response
    #[error("Server error: {status}")]
    Rejected { status: u16, message: Option<String> },

    /// 2xx response whose body could not be decoded
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Connect/timeout/IO failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Remote verification operations
#[async_trait]
pub trait EntryApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn verify_entry(
        &self,
        request: &VerifyEntryRequest,
    ) -> Result<VerifyEntryResponse, ApiError>;
}

/// reqwest-backed `EntryApi`
#[derive(Clone)]
pub struct ScannerApiClient {
    http: Client,
    base_url: String,
    auth: Arc<AuthSession>,
}

impl ScannerApiClient {
    /// Create new client
    ///
    /// # Arguments
    /// * `base_url` - backend root, e.g. `https://tickets.example.com`
    /// * `timeout` - whole-request timeout
    /// * `connect_timeout` - TCP/TLS connect timeout
    /// * `auth` - token holder shared with the state machines
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
        auth: Arc<AuthSession>,
    ) -> crate::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let mut req = self.http.post(&url).json(body);
        if let Some(token) = self.auth.token().await {
            req = req.bearer_auth(token);
        }

        tracing::debug!(url = %url, "ScannerApi: Sending request");

        let response = req.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "ScannerApi: HTTP request failed");
            ApiError::Transport(describe_transport_error(&e))
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "ScannerApi: Failed to read body");
            ApiError::Transport(describe_transport_error(&e))
        })?;

        tracing::debug!(url = %url, status = %status, len = bytes.len(), "ScannerApi: Got response");

        decode_response(status, &bytes)
    }
}

#[async_trait]
impl EntryApi for ScannerApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json(LOGIN_PATH, request).await
    }

    async fn verify_entry(
        &self,
        request: &VerifyEntryRequest,
    ) -> Result<VerifyEntryResponse, ApiError> {
        self.post_json(VERIFY_ENTRY_PATH, request).await
    }
}

/// Map a status + raw body to a typed response
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v["message"]
                    .as_str()
                    .or_else(|| v["error"].as_str())
                    .map(String::from)
            });
        tracing::warn!(status = %status, message = ?message, "ScannerApi: Request rejected");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(status = %status, error = %e, "ScannerApi: Failed to parse response");
        ApiError::Malformed(e.to_string())
    })
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        "Unable to reach server".to_string()
    } else {
        e.to_string()
    }
}
