//! Application state
//!
//! Configuration and the wiring of store, transport and state machines

use crate::login_machine::LoginMachine;
use crate::preference_store::{PreferenceStore, DEFAULT_PREFS_FILE};
use crate::scan_machine::{ScanMachine, DEFAULT_SCAN_COOLDOWN};
use crate::scanner_api::{AuthSession, EntryApi, ScannerApiClient};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ticketing backend root URL
    pub api_base_url: String,
    /// Preference store file
    pub prefs_path: PathBuf,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Repeat-detection window for the same QR payload
    pub scan_cooldown: Duration,
}

impl AppConfig {
    /// Load from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup (environment, test maps)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("SCANNER_API_URL").unwrap_or(defaults.api_base_url),
            prefs_path: lookup("SCANNER_PREFS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.prefs_path),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SCANNER_HTTP_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SCANNER_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            scan_cooldown: Duration::from_millis(parse_or(
                &lookup,
                "SCANNER_SCAN_COOLDOWN_MS",
                defaults.scan_cooldown.as_millis() as u64,
            )),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            prefs_path: PathBuf::from(DEFAULT_PREFS_FILE),
            request_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
            scan_cooldown: DEFAULT_SCAN_COOLDOWN,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key = %key, value = %raw, default = %default, "Invalid config value, using default");
        default
    })
}

/// Where the UI should start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Scanner,
}

/// Application state shared by the UI layer
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Persisted scanner session
    pub store: Arc<PreferenceStore>,
    /// Bearer token held by the transport
    pub auth: Arc<AuthSession>,
    /// Remote verification client
    pub api: Arc<dyn EntryApi>,
    /// Login flow
    pub login: Arc<LoginMachine>,
    /// Scan flow
    pub scanner: Arc<ScanMachine>,
}

impl AppState {
    /// Open the store, restore the auth token and build the HTTP client
    pub async fn build(config: AppConfig) -> crate::Result<Self> {
        let store = Arc::new(PreferenceStore::open(&config.prefs_path).await?);
        let auth = Arc::new(AuthSession::with_token(store.auth_token().await));
        let api: Arc<dyn EntryApi> = Arc::new(ScannerApiClient::new(
            config.api_base_url.clone(),
            config.request_timeout,
            config.connect_timeout,
            auth.clone(),
        )?);

        tracing::info!(
            api_base_url = %config.api_base_url,
            authenticated = auth.is_authenticated().await,
            "Scanner API client initialized"
        );

        Ok(Self::with_api(config, store, auth, api))
    }

    /// Wire the machines around an existing transport
    pub fn with_api(
        config: AppConfig,
        store: Arc<PreferenceStore>,
        auth: Arc<AuthSession>,
        api: Arc<dyn EntryApi>,
    ) -> Self {
        let login = Arc::new(LoginMachine::new(api.clone(), store.clone(), auth.clone()));
        let scanner = Arc::new(ScanMachine::new(
            api.clone(),
            store.clone(),
            auth.clone(),
            config.scan_cooldown,
        ));

        Self {
            config,
            store,
            auth,
            api,
            login,
            scanner,
        }
    }

    /// Scanner when a scanner code is persisted, otherwise Login
    pub async fn start_route(&self) -> Route {
        if self.store.scanner_code().await.is_some() {
            Route::Scanner
        } else {
            Route::Login
        }
    }
}
