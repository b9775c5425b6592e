//! services/client/src/auth/service.rs
//!
//! The auth service is what UI-facing code calls. It wraps the `SessionStore`,
//! logs every failure and turns it into something safe to show a reader, so no
//! error escapes to crash the caller.

use std::fmt;
use textbook_core::domain::{AuthProvider, Credentials, Session};
use textbook_core::ports::PortError;
use tracing::error;

use crate::auth::session_store::SessionStore;

pub const SIGN_IN_RETRY_MESSAGE: &str = "Sign in failed. Please try again.";
pub const SIGN_OUT_RETRY_MESSAGE: &str = "Sign out failed. Please try again.";

/// A failed auth action, carrying the message to show inline and the
/// underlying error for callers that want to branch on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthFailure {
    pub message: String,
    pub cause: PortError,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AuthFailure {}

#[derive(Clone)]
pub struct AuthService {
    store: SessionStore,
}

impl AuthService {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn sign_in(
        &self,
        provider: AuthProvider,
        credentials: &Credentials,
    ) -> Result<Session, AuthFailure> {
        self.store
            .sign_in(provider, credentials)
            .await
            .map_err(|e| {
                error!(%provider, error = %e, "Error signing in");
                let message = match &e {
                    PortError::Validation(msg) => msg.clone(),
                    _ => SIGN_IN_RETRY_MESSAGE.to_string(),
                };
                AuthFailure { message, cause: e }
            })
    }

    pub async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.store.sign_out().await.map_err(|e| {
            error!(error = %e, "Error signing out");
            AuthFailure {
                message: SIGN_OUT_RETRY_MESSAGE.to_string(),
                cause: e,
            }
        })
    }

    pub async fn get_session(&self) -> Option<Session> {
        self.store.get_session().await.unwrap_or_else(|e| {
            error!(error = %e, "Error getting session");
            None
        })
    }

    pub async fn is_authenticated(&self) -> bool {
        self.store.is_authenticated().await.unwrap_or_else(|e| {
            error!(error = %e, "Error checking authentication status");
            false
        })
    }

    pub async fn get_auth_token(&self) -> Option<String> {
        self.store.get_auth_token().await.unwrap_or_else(|e| {
            error!(error = %e, "Error getting auth token");
            None
        })
    }

    pub async fn get_user_id(&self) -> Option<String> {
        self.store.get_user_id().await.unwrap_or_else(|e| {
            error!(error = %e, "Error getting user ID");
            None
        })
    }

    pub async fn refresh_token(&self) -> bool {
        self.store.refresh().await.unwrap_or_else(|e| {
            error!(error = %e, "Error refreshing token");
            false
        })
    }
}
