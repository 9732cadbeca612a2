//! AuthSession - bearer token held by the transport
//!
//! Set on login, cleared on logout, restored from the preference store at startup.

use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct AuthSession {
    token: RwLock<Option<String>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Replace the token. Blank tokens count as none.
    pub async fn set(&self, token: Option<String>) {
        let token = token.filter(|t| !t.trim().is_empty());
        tracing::debug!(authenticated = token.is_some(), "AuthSession: Token updated");
        *self.token.write().await = token;
    }

    pub async fn clear(&self) {
        self.set(None).await;
    }
}
