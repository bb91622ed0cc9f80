use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use streetlight_common::error::Result;
use streetlight_common::types::{LoginResponse, UserProfile};

use crate::vault::TokenVault;
use crate::Gateway;

/// Credential exchange against the auth endpoints. The session depends on
/// this seam instead of the concrete [`Gateway`] so both the persisted
/// success path and the untouched-on-failure path are testable without a
/// running server.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn authenticate(&self, path: &str, email: &str, password: &str)
        -> Result<LoginResponse>;
}

#[async_trait]
impl AuthApi for Gateway {
    async fn authenticate(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse> {
        self.auth_request(path, email, password).await
    }
}

/// Where the session stands relative to the server. `Unknown` only lasts
/// until the startup vault read completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unknown,
    Authenticated,
    Unauthenticated,
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
    loaded: bool,
}

/// Process-wide holder of the bearer token and user profile. One instance
/// per process; every credential read and write goes through here so the
/// vault and in-memory copy never diverge.
pub struct Session {
    vault: Arc<dyn TokenVault>,
    token_key: String,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(vault: Arc<dyn TokenVault>, token_key: &str) -> Self {
        Self {
            vault,
            token_key: token_key.to_string(),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Startup: load the persisted token without validating it against the
    /// server. An expired token surfaces later as a request failure, not as
    /// a startup failure. A vault read error is logged and treated as
    /// "no token" so the app still reaches the login screen.
    pub async fn load(&self) {
        let token = match self.vault.get(&self.token_key).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted token");
                None
            }
        };
        let mut state = self.state.write().await;
        state.token = token;
        state.user = None;
        state.loaded = true;
    }

    pub async fn status(&self) -> SessionStatus {
        let state = self.state.read().await;
        if !state.loaded {
            SessionStatus::Unknown
        } else if state.token.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }

    /// Authenticated is exactly "a token is present"; there is no separate
    /// flag to drift.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    /// Exchange credentials for a token. On any failure the session is left
    /// untouched and the error carries the server's message when one was
    /// extractable.
    pub async fn login(&self, api: &dyn AuthApi, email: &str, password: &str) -> Result<()> {
        let resp = api.authenticate("/auth/login", email, password).await?;
        self.store_authenticated(resp.access_token, resp.user).await;
        info!("Logged in");
        Ok(())
    }

    /// Same contract as [`Session::login`] against the registration
    /// endpoint. A duplicate account comes back as
    /// [`streetlight_common::StreetlightError::AccountExists`] so the UI
    /// can offer the login path.
    pub async fn register(&self, api: &dyn AuthApi, email: &str, password: &str) -> Result<()> {
        let resp = api.authenticate("/auth/register", email, password).await?;
        self.store_authenticated(resp.access_token, resp.user).await;
        info!("Registered");
        Ok(())
    }

    async fn store_authenticated(&self, token: String, user: UserProfile) {
        if let Err(e) = self.vault.set(&self.token_key, &token).await {
            // The in-memory session still works for this process; the next
            // launch will just need a fresh login.
            warn!(error = %e, "Failed to persist token");
        }
        let mut state = self.state.write().await;
        state.token = Some(token);
        state.user = Some(user);
        state.loaded = true;
    }

    /// Clear persisted and in-memory state unconditionally. Never fails,
    /// even when no token was present; a vault error is logged only.
    pub async fn logout(&self) {
        if let Err(e) = self.vault.clear(&self.token_key).await {
            warn!(error = %e, "Failed to clear persisted token");
        }
        let mut state = self.state.write().await;
        state.token = None;
        state.user = None;
        state.loaded = true;
        info!("Logged out");
    }
}
